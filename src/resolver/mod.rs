use async_trait::async_trait;

pub(crate) mod ytdlp;

pub(crate) use ytdlp::YtDlp;

/// Stream metadata returned by the resolver. The URL is short-lived and only
/// good for the current call; the rest is carried for logging.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResolvedStream {
    /// Direct media URL, empty when the metadata carried no usable URL
    pub(crate) url: String,
    pub(crate) format: Option<String>,
    pub(crate) width: Option<i64>,
    pub(crate) height: Option<i64>,
    pub(crate) title: Option<String>,
}

impl ResolvedStream {
    pub(crate) fn describe(&self) -> String {
        let title = self.title.as_deref().unwrap_or("<untitled>");
        match (self.width, self.height) {
            (Some(w), Some(h)) => format!("{} ({}x{})", title, w, h),
            _ => title.to_string(),
        }
    }
}

#[async_trait]
pub(crate) trait StreamResolver {
    fn name(&self) -> &'static str;

    /// Turns a watch-page URL into a direct stream URL without downloading
    /// the media itself.
    async fn resolve(&self, page_url: &str) -> anyhow::Result<ResolvedStream>;
}
