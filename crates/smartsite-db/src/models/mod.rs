pub mod activity_log;
pub mod feature_request;
pub mod tenant;
pub mod tenant_feature_flag;
pub mod tenant_site_variant;
