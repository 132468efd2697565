//! qstore-list - List and search imported queries.

fn main() -> std::process::ExitCode {
    querystore::cmd::list::main()
}
