use prost_types::Timestamp;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AdditionalInfo {
    #[prost(bool, tag = "1")]
    pub is_file_based: bool,
    /// One of `no_upload`, `uploaded`, `preparing`, `failed`, `ready`
    #[prost(string, tag = "2")]
    pub file_status: String,
    #[prost(string, optional, tag = "3")]
    pub failed_reason: Option<String>,
    #[prost(string, tag = "4")]
    pub public_base_url: String,
    #[prost(string, tag = "5")]
    pub documentation_url: String,
    #[prost(bool, tag = "6")]
    pub is_locally_stored: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Integration {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub display_name: String,
    #[prost(string, tag = "3")]
    pub unique_name: String,
    #[prost(string, tag = "4")]
    pub description: String,
    #[prost(bool, tag = "5")]
    pub public: bool,
    #[prost(string, tag = "6")]
    pub created_by: String,
    #[prost(message, optional, tag = "7")]
    pub additional_info: Option<AdditionalInfo>,
    #[prost(message, optional, tag = "8")]
    pub created_at: Option<Timestamp>,
    #[prost(message, optional, tag = "9")]
    pub updated_at: Option<Timestamp>,
    #[prost(message, optional, tag = "10")]
    pub deleted_at: Option<Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateIntegrationRequest {
    #[prost(string, tag = "1")]
    pub display_name: String,
    #[prost(string, tag = "2")]
    pub unique_name: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(bool, tag = "4")]
    pub public: bool,
    #[prost(string, tag = "5")]
    pub public_base_url: String,
    #[prost(string, tag = "6")]
    pub documentation_url: String,
    #[prost(bool, tag = "7")]
    pub is_locally_stored: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateIntegrationResponse {
    #[prost(message, optional, tag = "1")]
    pub integration: Option<Integration>,
    /// True when an `integration_created` event went out. False when none
    /// was due or the record was stored but publishing failed.
    #[prost(bool, tag = "2")]
    pub event_published: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateIntegrationRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, optional, tag = "2")]
    pub display_name: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub unique_name: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub description: Option<String>,
    #[prost(bool, optional, tag = "5")]
    pub public: Option<bool>,
    #[prost(string, optional, tag = "6")]
    pub public_base_url: Option<String>,
    #[prost(string, optional, tag = "7")]
    pub documentation_url: Option<String>,
    #[prost(bool, optional, tag = "8")]
    pub is_locally_stored: Option<bool>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteIntegrationRequest {
    #[prost(string, tag = "1")]
    pub id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IntegrationResponse {
    #[prost(message, optional, tag = "1")]
    pub integration: Option<Integration>,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct GetUserIntegrationsRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SearchIntegrationRequest {
    #[prost(string, tag = "1")]
    pub query: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IntegrationList {
    #[prost(message, repeated, tag = "1")]
    pub integrations: Vec<Integration>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IntegrationPage {
    #[prost(message, repeated, tag = "1")]
    pub integrations: Vec<Integration>,
    #[prost(int64, tag = "2")]
    pub total: i64,
}
