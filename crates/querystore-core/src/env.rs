//! Known data environments and data families.
//!
//! A data environment is the backend a query targets and is the top-level
//! partition of the registry. Definition files may name an environment by
//! any of its aliases; stores are keyed by the canonical name.

use std::fmt;
use std::str::FromStr;

/// A known query backend.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum DataEnvironment {
    /// Not a recognized environment name.
    #[default]
    Unknown,
    /// Microsoft Sentinel / Log Analytics.
    AzureSentinel,
    /// Azure Data Explorer.
    Kusto,
    /// Defender for Cloud.
    AzureSecurityCenter,
    /// Microsoft Graph security API.
    MSGraph,
    /// Defender for Endpoint.
    MDE,
    /// Local files.
    LocalData,
    /// Splunk.
    Splunk,
    /// Open Threat Research Forge datasets.
    OTRF,
    /// Sumo Logic.
    Sumologic,
    /// Microsoft 365 Defender.
    M365D,
    /// Cybereason.
    Cybereason,
    /// Elastic.
    Elastic,
    /// `OSQuery` log files.
    OSQueryLogs,
    /// Sentinel through the newer Kusto-based driver.
    MSSentinelNew,
    /// Kusto through the newer driver.
    KustoNew,
    /// Velociraptor log files.
    VelociraptorLogs,
    /// Microsoft 365 Defender through Graph.
    M365DGraph,
    /// Prisma Cloud.
    Prismacloud,
}

impl DataEnvironment {
    /// Parse a declared environment token.
    ///
    /// Aliases map to their canonical variant. Anything unrecognized yields
    /// [`DataEnvironment::Unknown`].
    pub fn parse(token: &str) -> Self {
        match token {
            "AzureSentinel" | "LogAnalytics" | "MSSentinel" => Self::AzureSentinel,
            "Kusto" => Self::Kusto,
            "AzureSecurityCenter" => Self::AzureSecurityCenter,
            "MSGraph" | "SecurityGraph" => Self::MSGraph,
            "MDE" | "MDATP" => Self::MDE,
            "LocalData" => Self::LocalData,
            "Splunk" => Self::Splunk,
            "OTRF" | "Mordor" => Self::OTRF,
            "Sumologic" => Self::Sumologic,
            "M365D" => Self::M365D,
            "Cybereason" => Self::Cybereason,
            "Elastic" => Self::Elastic,
            "OSQueryLogs" | "OSQuery" => Self::OSQueryLogs,
            "MSSentinel_New" => Self::MSSentinelNew,
            "Kusto_New" => Self::KustoNew,
            "VelociraptorLogs" | "Velociraptor" => Self::VelociraptorLogs,
            "M365DGraph" => Self::M365DGraph,
            "Prismacloud" => Self::Prismacloud,
            _ => Self::Unknown,
        }
    }

    /// Canonical name of the environment.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::AzureSentinel => "AzureSentinel",
            Self::Kusto => "Kusto",
            Self::AzureSecurityCenter => "AzureSecurityCenter",
            Self::MSGraph => "MSGraph",
            Self::MDE => "MDE",
            Self::LocalData => "LocalData",
            Self::Splunk => "Splunk",
            Self::OTRF => "OTRF",
            Self::Sumologic => "Sumologic",
            Self::M365D => "M365D",
            Self::Cybereason => "Cybereason",
            Self::Elastic => "Elastic",
            Self::OSQueryLogs => "OSQueryLogs",
            Self::MSSentinelNew => "MSSentinel_New",
            Self::KustoNew => "Kusto_New",
            Self::VelociraptorLogs => "VelociraptorLogs",
            Self::M365DGraph => "M365DGraph",
            Self::Prismacloud => "Prismacloud",
        }
    }
}

impl fmt::Display for DataEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve the store name for an environment value declared in a file.
///
/// Dotted values (`"DataEnvironment.Kusto"`) contribute their second
/// segment. Recognized tokens are canonicalized; unrecognized tokens are
/// returned verbatim so their queries are still grouped.
pub fn environment_name(declared: &str) -> String {
    let token = if declared.contains('.') {
        declared.split('.').nth(1).unwrap_or_default()
    } else {
        declared
    };
    match DataEnvironment::parse(token) {
        DataEnvironment::Unknown => token.to_string(),
        env => env.name().to_string(),
    }
}

/// A well-known data family.
///
/// Families are free-form dotted strings in definition files; this enum
/// names the common top-level ones for typed lookups.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataFamily {
    /// Windows security events.
    WindowsSecurity,
    /// Linux syslog.
    LinuxSyslog,
    /// Security alerts.
    SecurityAlert,
    /// Graph security alerts.
    SecurityGraphAlert,
    /// Linux audit logs.
    LinuxAudit,
    /// Azure network flows.
    AzureNetwork,
    /// Defender for Endpoint.
    MDATP,
    /// Splunk.
    Splunk,
    /// Azure resource graph.
    ResourceGraph,
    /// Sumo Logic.
    Sumologic,
    /// Cybereason.
    Cybereason,
    /// Elastic.
    Elastic,
    /// Prisma Cloud.
    Prismacloud,
}

impl DataFamily {
    /// String form used as a family path.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WindowsSecurity => "WindowsSecurity",
            Self::LinuxSyslog => "LinuxSyslog",
            Self::SecurityAlert => "SecurityAlert",
            Self::SecurityGraphAlert => "SecurityGraphAlert",
            Self::LinuxAudit => "LinuxAudit",
            Self::AzureNetwork => "AzureNetwork",
            Self::MDATP => "MDATP",
            Self::Splunk => "Splunk",
            Self::ResourceGraph => "ResourceGraph",
            Self::Sumologic => "Sumologic",
            Self::Cybereason => "Cybereason",
            Self::Elastic => "Elastic",
            Self::Prismacloud => "Prismacloud",
        }
    }
}

impl FromStr for DataFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WindowsSecurity" => Ok(Self::WindowsSecurity),
            "LinuxSyslog" => Ok(Self::LinuxSyslog),
            "SecurityAlert" => Ok(Self::SecurityAlert),
            "SecurityGraphAlert" => Ok(Self::SecurityGraphAlert),
            "LinuxAudit" => Ok(Self::LinuxAudit),
            "AzureNetwork" => Ok(Self::AzureNetwork),
            "MDATP" => Ok(Self::MDATP),
            "Splunk" => Ok(Self::Splunk),
            "ResourceGraph" => Ok(Self::ResourceGraph),
            "Sumologic" => Ok(Self::Sumologic),
            "Cybereason" => Ok(Self::Cybereason),
            "Elastic" => Ok(Self::Elastic),
            "Prismacloud" => Ok(Self::Prismacloud),
            _ => Err(format!("unknown data family: {s}")),
        }
    }
}

impl AsRef<str> for DataFamily {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for DataFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
