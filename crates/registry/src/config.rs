use serde::Deserialize;

use crate::error::ConfigError;

/// Registry configuration.
///
/// Every field has a default, so an empty document is a valid config:
///
/// ```toml
/// [trace]
/// registry = true
/// cleanup = true
///
/// [defaults]
/// include_self = true
/// proceed_when_delegate_absent = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	pub trace: TraceFlags,
	pub defaults: RegisterDefaults,
}

impl RegistryConfig {
	/// Parses a config from TOML text.
	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(text)?)
	}
}

/// Debug tracing toggles. Both are off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraceFlags {
	/// Trace register/unregister and bridge resolution.
	pub registry: bool,
	/// Trace the steps of each cleanup cascade.
	pub cleanup: bool,
}

/// Registration defaults used when [`RegisterOptions`](crate::RegisterOptions)
/// leaves a flag unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegisterDefaults {
	/// Append the delegate's own node to its dependents.
	pub include_self: bool,
	/// Proceed with cleanup when the delegate is gone.
	pub proceed_when_delegate_absent: bool,
}

impl Default for RegisterDefaults {
	fn default() -> Self {
		Self {
			include_self: true,
			proceed_when_delegate_absent: true,
		}
	}
}
