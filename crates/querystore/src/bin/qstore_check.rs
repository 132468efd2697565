//! qstore-check - Validate query definition directories.

fn main() -> std::process::ExitCode {
    querystore::cmd::check::main()
}
