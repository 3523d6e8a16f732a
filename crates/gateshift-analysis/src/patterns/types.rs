//! Core pattern vocabulary: gateways, categories, endpoint types.

use serde::{Deserialize, Serialize};

/// Which side of the migration a pattern table describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gateway {
    /// Converge (migration source).
    Converge,
    /// Elavon (migration target).
    Elavon,
}

impl Gateway {
    pub fn name(&self) -> &'static str {
        match self {
            Gateway::Converge => "converge",
            Gateway::Elavon => "elavon",
        }
    }

    /// The other side of the migration.
    pub fn counterpart(&self) -> Gateway {
        match self {
            Gateway::Converge => Gateway::Elavon,
            Gateway::Elavon => Gateway::Converge,
        }
    }
}

impl std::fmt::Display for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Structural category a template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternCategory {
    EndpointUrl,
    CredentialField,
    HttpCall,
    ApiUrl,
}

impl PatternCategory {
    /// Key used for this category in pattern config files.
    pub fn config_key(&self) -> &'static str {
        match self {
            PatternCategory::EndpointUrl => "endpoints",
            PatternCategory::CredentialField => "credentialFields",
            PatternCategory::HttpCall => "httpCalls",
            PatternCategory::ApiUrl => "apiUrls",
        }
    }
}

impl std::fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.config_key())
    }
}

/// Converge endpoint families recognized by the endpoint-type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndpointType {
    HostedPayments,
    Checkout,
    ProcessTransaction,
    BatchProcessing,
    DeviceManagement,
}

impl EndpointType {
    /// Resolve a named endpoint category from the pattern config.
    /// Unrecognized categories resolve to `None`.
    pub fn from_category_key(key: &str) -> Option<EndpointType> {
        match key {
            "hostedPayments" => Some(EndpointType::HostedPayments),
            "checkout" => Some(EndpointType::Checkout),
            "processTransaction" => Some(EndpointType::ProcessTransaction),
            "batchProcessing" => Some(EndpointType::BatchProcessing),
            "deviceManagement" => Some(EndpointType::DeviceManagement),
            _ => None,
        }
    }

    pub fn category_key(&self) -> &'static str {
        match self {
            EndpointType::HostedPayments => "hostedPayments",
            EndpointType::Checkout => "checkout",
            EndpointType::ProcessTransaction => "processTransaction",
            EndpointType::BatchProcessing => "batchProcessing",
            EndpointType::DeviceManagement => "deviceManagement",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keys_round_trip() {
        for ty in [
            EndpointType::HostedPayments,
            EndpointType::Checkout,
            EndpointType::ProcessTransaction,
            EndpointType::BatchProcessing,
            EndpointType::DeviceManagement,
        ] {
            assert_eq!(EndpointType::from_category_key(ty.category_key()), Some(ty));
        }
    }

    #[test]
    fn unknown_endpoint_key_is_none() {
        assert_eq!(EndpointType::from_category_key("recurringBilling"), None);
        assert_eq!(EndpointType::from_category_key("HOSTEDPAYMENTS"), None);
    }
}
