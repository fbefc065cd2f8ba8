//! Feature request classification and the screening workflow.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::completion::{
    CompletionBackend, CompletionRequest, OpenAiClient, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
use crate::wishlist::{HttpWishlistSink, RequestKind, WishlistItem, WishlistSink};
use crate::{ClassificationError, ModuleCategory, ModuleRegistry, ScreenerBuildError};

/// Screening settings
#[derive(Debug, Clone, Deserialize)]
pub struct ScreeningConfig {
    /// JSON module registry; the built-in registry is used if unreadable
    #[serde(default = "default_modules_path")]
    pub modules_path: PathBuf,
    /// Completion API key; without one only keyword matching runs
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Wishlist collector; wishlist items are not forwarded without one
    #[serde(default)]
    pub wishlist_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_modules_path() -> PathBuf {
    PathBuf::from("config/modules.json")
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            modules_path: default_modules_path(),
            openai_api_key: None,
            openai_base_url: default_base_url(),
            model: default_model(),
            wishlist_url: None,
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

/// Result of classifying one description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub category: ModuleCategory,
    pub matched_module: Option<String>,
}

impl Classification {
    fn wishlist() -> Self {
        Self {
            category: ModuleCategory::Wishlist,
            matched_module: None,
        }
    }
}

/// Everything the screening workflow decided about a request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningOutcome {
    pub category: ModuleCategory,
    pub matched_module: Option<String>,
    pub response: String,
    pub should_submit_to_dev: bool,
    pub request_kind: Option<RequestKind>,
    pub wishlist_submitted: bool,
    pub classifier_error: Option<String>,
}

/// Classifies feature requests and routes wishlist items.
///
/// Built once at start-up and shared; both outbound clients are optional.
pub struct FeatureScreener {
    registry: ModuleRegistry,
    backend: Option<Arc<dyn CompletionBackend>>,
    wishlist: Option<Arc<dyn WishlistSink>>,
}

impl FeatureScreener {
    pub fn new(
        registry: ModuleRegistry,
        backend: Option<Arc<dyn CompletionBackend>>,
        wishlist: Option<Arc<dyn WishlistSink>>,
    ) -> Self {
        Self {
            registry,
            backend,
            wishlist,
        }
    }

    /// Load the registry and build HTTP clients from `config`
    pub fn from_config(config: &ScreeningConfig) -> Result<Self, ScreenerBuildError> {
        let registry = ModuleRegistry::load_or_default(&config.modules_path);
        let timeout = Duration::from_secs(config.request_timeout_secs);

        let backend = match config.openai_api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => Some(Arc::new(OpenAiClient::new(
                &config.openai_base_url,
                key,
                &config.model,
                timeout,
            )?) as Arc<dyn CompletionBackend>),
            None => {
                warn!("No completion API key configured, classification limited to keyword matches");
                None
            }
        };

        let wishlist = match config.wishlist_url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => Some(Arc::new(HttpWishlistSink::new(url, timeout)?) as Arc<dyn WishlistSink>),
            None => None,
        };

        info!(
            modules = registry.len(),
            backend = backend.is_some(),
            wishlist = wishlist.is_some(),
            "Feature screener ready"
        );

        Ok(Self::new(registry, backend, wishlist))
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Classify a description.
    ///
    /// A registry module named in the description wins outright. Otherwise
    /// the backend picks the closest module; a reply that is not a known
    /// module yields [`ModuleCategory::Wishlist`].
    pub async fn classify(&self, description: &str) -> Result<Classification, ClassificationError> {
        let normalized = description.trim().to_lowercase();

        if let Some((module, category)) = self.registry.find_in(&normalized) {
            return Ok(Classification {
                category,
                matched_module: Some(module.to_string()),
            });
        }

        let backend = self.backend.as_ref().ok_or(ClassificationError::NotConfigured)?;

        let modules = self.registry.names().collect::<Vec<_>>().join(", ");
        let request = CompletionRequest {
            system: format!(
                "You are a feature request classifier. Given a feature request, name the \
                 closest matching module from this list: {modules}. Reply with the exact \
                 module name only. If none match well, reply \"unknown\"."
            ),
            user: description.to_string(),
            temperature: 0.3,
            max_tokens: 50,
        };

        let reply = backend.complete(&request).await?;
        let predicted = normalize_reply(&reply);

        Ok(match self.registry.get(&predicted) {
            Some(category) => Classification {
                category,
                matched_module: Some(predicted),
            },
            None => Classification::wishlist(),
        })
    }

    /// Ask the backend what kind of request this is; `Unknown` on any failure
    pub async fn request_kind(&self, description: &str) -> RequestKind {
        let Some(backend) = self.backend.as_ref() else {
            return RequestKind::Unknown;
        };

        let request = CompletionRequest {
            system: "Classify the following feature request as exactly one of: \
                     \"screen\" (new UI), \"feature\" (new functionality), \
                     \"automation\" (process improvement) or \"unknown\". \
                     Reply with the category name only."
                .to_string(),
            user: description.to_string(),
            temperature: 0.1,
            max_tokens: 10,
        };

        match backend.complete(&request).await {
            Ok(reply) => RequestKind::from_reply(&reply),
            Err(e) => {
                warn!(error = %e, "Could not determine request kind");
                RequestKind::Unknown
            }
        }
    }

    /// Classify and answer a request without any outbound side effect.
    ///
    /// Classification errors are not fatal: the request is treated as a
    /// wishlist item and the error is kept on the outcome. Wishlist items
    /// also get a request kind; `wishlist_submitted` is always false here.
    pub async fn assess(&self, description: &str) -> ScreeningOutcome {
        let (classification, classifier_error) = match self.classify(description).await {
            Ok(c) => (c, None),
            Err(e) => {
                warn!(error = %e, "Classification failed, treating request as wishlist");
                (Classification::wishlist(), Some(e.to_string()))
            }
        };

        let category = classification.category;
        let response =
            response_for_category(category, classification.matched_module.as_deref());

        let request_kind = if category == ModuleCategory::Wishlist {
            Some(self.request_kind(description).await)
        } else {
            None
        };

        ScreeningOutcome {
            category,
            matched_module: classification.matched_module,
            response,
            should_submit_to_dev: category.goes_to_development(),
            request_kind,
            wishlist_submitted: false,
            classifier_error,
        }
    }

    /// Send a wishlist outcome to the collector.
    ///
    /// Returns whether the collector accepted it. Non-wishlist outcomes and
    /// screeners without a sink are never forwarded.
    pub async fn forward_wishlist(
        &self,
        business_id: &str,
        description: &str,
        outcome: &ScreeningOutcome,
    ) -> bool {
        let (Some(sink), Some(kind)) = (&self.wishlist, outcome.request_kind) else {
            return false;
        };
        if outcome.category != ModuleCategory::Wishlist {
            return false;
        }

        let item = WishlistItem {
            business_id: business_id.to_string(),
            description: description.to_string(),
            category: kind,
            submitted_at: Utc::now(),
        };
        match sink.submit(&item).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, business_id, "Wishlist submission failed");
                false
            }
        }
    }

    /// [`assess`](Self::assess) then [`forward_wishlist`](Self::forward_wishlist)
    pub async fn screen(&self, business_id: &str, description: &str) -> ScreeningOutcome {
        let mut outcome = self.assess(description).await;
        outcome.wishlist_submitted = self.forward_wishlist(business_id, description, &outcome).await;
        outcome
    }
}

fn normalize_reply(reply: &str) -> String {
    reply
        .trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == '.')
        .to_lowercase()
}

/// Customer-facing reply for a category
pub fn response_for_category(category: ModuleCategory, module: Option<&str>) -> String {
    match category {
        ModuleCategory::TemplateReady => format!(
            "Great news: the {} already exists as a template in our system. \
             I'll send it over to the development team right away for integration into your project.",
            module.unwrap_or("requested module")
        ),
        ModuleCategory::SimpleCustom => "We don't have a pre-built template for this specific request yet, \
             but it's relatively straightforward to implement. I'll draft the specifications \
             and submit it to our development team for creation."
            .to_string(),
        ModuleCategory::Wishlist => "That's an interesting idea! It would require some additional \
             development work from our team, so I've added it to our Wishlist for future \
             consideration. In the meantime, would you like to explore a simpler alternative \
             or discuss other options that might meet your needs?"
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompletionError, WishlistError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with canned answers in order and records prompts
    struct ScriptedBackend {
        replies: Mutex<Vec<Result<String, u16>>>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<&str, u16>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(
                    replies
                        .into_iter()
                        .rev()
                        .map(|r| r.map(str::to_string))
                        .collect(),
                ),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<CompletionRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
            self.seen.lock().unwrap().push(request.clone());
            match self.replies.lock().unwrap().pop() {
                Some(Ok(reply)) => Ok(reply),
                Some(Err(status)) => Err(CompletionError::Status {
                    status,
                    body: String::new(),
                }),
                None => Err(CompletionError::EmptyResponse),
            }
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        items: Mutex<Vec<WishlistItem>>,
        fail: bool,
    }

    #[async_trait]
    impl WishlistSink for RecordingSink {
        async fn submit(&self, item: &WishlistItem) -> Result<(), WishlistError> {
            self.items.lock().unwrap().push(item.clone());
            if self.fail {
                Err(WishlistError::Status(500))
            } else {
                Ok(())
            }
        }
    }

    fn screener(
        backend: Option<Arc<ScriptedBackend>>,
        sink: Option<Arc<RecordingSink>>,
    ) -> FeatureScreener {
        FeatureScreener::new(
            ModuleRegistry::default(),
            backend.map(|b| b as Arc<dyn CompletionBackend>),
            sink.map(|s| s as Arc<dyn WishlistSink>),
        )
    }

    #[tokio::test]
    async fn test_keyword_hit_skips_backend() {
        let backend = ScriptedBackend::new(vec![]);
        let screener = screener(Some(backend.clone()), None);

        let result = screener
            .classify("  Could we get ANALYTICS on the dashboard? ")
            .await
            .unwrap();

        assert_eq!(result.category, ModuleCategory::TemplateReady);
        assert_eq!(result.matched_module.as_deref(), Some("analytics"));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_backend_answer_maps_through_registry() {
        let backend = ScriptedBackend::new(vec![Ok(" Simple_Info_Page\n")]);
        let screener = screener(Some(backend.clone()), None);

        let result = screener.classify("An about-us page").await.unwrap();
        assert_eq!(result.category, ModuleCategory::SimpleCustom);
        assert_eq!(result.matched_module.as_deref(), Some("simple_info_page"));

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].temperature, 0.3);
        assert_eq!(calls[0].max_tokens, 50);
        assert!(calls[0].system.contains("analytics, client_upload_portal, simple_info_page"));
        assert_eq!(calls[0].user, "An about-us page");
    }

    #[tokio::test]
    async fn test_unknown_answer_is_wishlist() {
        let backend = ScriptedBackend::new(vec![Ok("unknown"), Ok("booking_engine")]);
        let screener = screener(Some(backend), None);

        for _ in 0..2 {
            let result = screener.classify("Something novel").await.unwrap();
            assert_eq!(result, Classification::wishlist());
        }
    }

    #[tokio::test]
    async fn test_classify_errors() {
        let screener_without_backend = screener(None, None);
        assert!(matches!(
            screener_without_backend.classify("Something novel").await,
            Err(ClassificationError::NotConfigured)
        ));

        let failing = screener(Some(ScriptedBackend::new(vec![Err(503)])), None);
        assert!(matches!(
            failing.classify("Something novel").await,
            Err(ClassificationError::Unavailable(CompletionError::Status { status: 503, .. }))
        ));
    }

    #[tokio::test]
    async fn test_request_kind() {
        let backend = ScriptedBackend::new(vec![Ok("Automation"), Err(500)]);
        let screener = screener(Some(backend.clone()), None);

        assert_eq!(screener.request_kind("Auto-send invoices").await, RequestKind::Automation);
        assert_eq!(screener.request_kind("Auto-send invoices").await, RequestKind::Unknown);
        assert_eq!(backend.calls()[0].max_tokens, 10);

        assert_eq!(
            self::screener(None, None).request_kind("x").await,
            RequestKind::Unknown
        );
    }

    #[tokio::test]
    async fn test_screen_template_ready_goes_to_dev() {
        let sink = Arc::new(RecordingSink::default());
        let screener = screener(None, Some(sink.clone()));

        let outcome = screener.screen("tenant-1", "analytics please").await;

        assert_eq!(outcome.category, ModuleCategory::TemplateReady);
        assert!(outcome.should_submit_to_dev);
        assert!(outcome.response.contains("analytics already exists"));
        assert!(outcome.request_kind.is_none());
        assert!(!outcome.wishlist_submitted);
        assert!(sink.items.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_screen_forwards_wishlist_item() {
        let backend = ScriptedBackend::new(vec![Ok("unknown"), Ok("screen")]);
        let sink = Arc::new(RecordingSink::default());
        let screener = screener(Some(backend), Some(sink.clone()));

        let outcome = screener.screen("tenant-9", "A drag and drop kanban board").await;

        assert_eq!(outcome.category, ModuleCategory::Wishlist);
        assert!(!outcome.should_submit_to_dev);
        assert_eq!(outcome.request_kind, Some(RequestKind::Screen));
        assert!(outcome.wishlist_submitted);
        assert!(outcome.classifier_error.is_none());

        let items = sink.items.lock().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].business_id, "tenant-9");
        assert_eq!(items[0].category, RequestKind::Screen);
    }

    #[tokio::test]
    async fn test_screen_records_classifier_error() {
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..Default::default()
        });
        let screener = screener(Some(ScriptedBackend::new(vec![Err(502)])), Some(sink.clone()));

        let outcome = screener.screen("tenant-2", "Something novel").await;

        assert_eq!(outcome.category, ModuleCategory::Wishlist);
        assert!(outcome.classifier_error.unwrap().contains("502"));
        // Backend script is exhausted, so the kind falls back to unknown
        assert_eq!(outcome.request_kind, Some(RequestKind::Unknown));
        assert!(!outcome.wishlist_submitted);
        assert_eq!(sink.items.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_assess_has_no_side_effects() {
        let backend = ScriptedBackend::new(vec![Ok("unknown"), Ok("feature")]);
        let sink = Arc::new(RecordingSink::default());
        let screener = screener(Some(backend), Some(sink.clone()));

        let outcome = screener.assess("A loyalty points program").await;
        assert_eq!(outcome.category, ModuleCategory::Wishlist);
        assert_eq!(outcome.request_kind, Some(RequestKind::Feature));
        assert!(!outcome.wishlist_submitted);
        assert!(sink.items.lock().unwrap().is_empty());

        assert!(screener.forward_wishlist("tenant-3", "A loyalty points program", &outcome).await);
        assert_eq!(sink.items.lock().unwrap()[0].category, RequestKind::Feature);

        let template = screener.assess("analytics").await;
        assert!(!screener.forward_wishlist("tenant-3", "analytics", &template).await);
        assert_eq!(sink.items.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_response_for_category() {
        assert!(response_for_category(ModuleCategory::TemplateReady, None)
            .contains("requested module"));
        assert!(response_for_category(ModuleCategory::SimpleCustom, Some("x"))
            .contains("straightforward"));
        assert!(response_for_category(ModuleCategory::Wishlist, None).contains("Wishlist"));
    }

    #[test]
    fn test_config_defaults_deserialize() {
        let config: ScreeningConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.modules_path, PathBuf::from("config/modules.json"));
        assert!(config.wishlist_url.is_none());
    }

    #[test]
    fn test_from_config_without_clients() {
        let screener = FeatureScreener::from_config(&ScreeningConfig {
            modules_path: "/nonexistent/modules.json".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(screener.registry(), &ModuleRegistry::default());
        assert!(screener.backend.is_none());
        assert!(screener.wishlist.is_none());
    }
}
