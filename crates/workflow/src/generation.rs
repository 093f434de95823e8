//! Campaign content generation.

use regatta_core::campaign::{Channel, ChannelSelection};
use serde_json::{Map, Value};

use crate::error::WorkflowError;
use crate::executor::{WorkflowExecutor, WorkflowKind};

/// Inputs to the generation workflow, taken from a stored campaign.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Sent as the workflow's `topic`. The planner uses the campaign title.
    pub topic: String,
    pub product_skus: Vec<String>,
    pub channels: ChannelSelection,
    pub image_channels: ChannelSelection,
    pub notes: Option<String>,
    pub content_focus: i16,
}

/// What generation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedContent {
    /// The full workflow result, stored verbatim on the campaign.
    pub result: Value,
    pub doc_url: Option<String>,
    pub folder_url: Option<String>,
}

fn flag(selection: &ChannelSelection, channel: Channel) -> Value {
    let enabled = selection.get(&channel).copied().unwrap_or(false);
    Value::from(if enabled { "true" } else { "false" })
}

impl GenerationRequest {
    /// Flattened variables. Channel flags travel as `"true"`/`"false"` strings.
    pub fn variables(&self) -> Map<String, Value> {
        let mut vars = Map::new();
        vars.insert("topic".into(), self.topic.clone().into());
        vars.insert("bundleId".into(), "".into());
        vars.insert(
            "products".into(),
            Value::Array(self.product_skus.iter().cloned().map(Value::from).collect()),
        );
        for channel in Channel::ALL {
            vars.insert(
                format!("channels_{}", channel.as_str()),
                flag(&self.channels, channel),
            );
        }
        for channel in Channel::IMAGE_CAPABLE {
            vars.insert(
                format!("imageChannels_{}", channel.as_str()),
                flag(&self.image_channels, channel),
            );
        }
        vars.insert(
            "notes".into(),
            self.notes.clone().unwrap_or_default().into(),
        );
        vars.insert("contentFocus".into(), self.content_focus.to_string().into());
        vars
    }
}

/// Run the generation workflow and pick out the document links.
pub async fn generate_campaign(
    executor: &dyn WorkflowExecutor,
    request: &GenerationRequest,
) -> Result<GeneratedContent, WorkflowError> {
    let result = executor
        .execute(WorkflowKind::CampaignGeneration, request.variables())
        .await?;

    let link = |key: &str| {
        result
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let doc_url = link("docUrl");
    let folder_url = link("folderUrl");

    tracing::info!(
        topic = %request.topic,
        has_doc = doc_url.is_some(),
        "Campaign content generated",
    );

    Ok(GeneratedContent {
        doc_url,
        folder_url,
        result,
    })
}
