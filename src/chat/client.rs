use color_eyre::{eyre::eyre, Result};
use std::sync::Arc;
use url::Url;

use super::{Chat, ChatUser, Message};
use crate::config::Config;
use crate::http::{Requester, ReqwestTransport, SessionHeaders};
use crate::pagination::{HttpPageFetcher, PageOptions, DEFAULT_PAGE_LIMIT};

/// Entry point to the chat API: resolves entity URLs and builds facades.
#[derive(Clone, Debug)]
pub struct ChatClient {
  api: Url,
  requester: Requester,
  page_limit: u32,
}

impl ChatClient {
  /// `api` must be a base URL that entity paths can be appended to.
  pub fn new(api: Url, requester: Requester) -> Result<Self> {
    if api.cannot_be_a_base() {
      return Err(eyre!("API URL {} cannot be used as a base URL", api));
    }

    Ok(Self {
      api,
      requester,
      page_limit: DEFAULT_PAGE_LIMIT,
    })
  }

  /// Build a client from configuration and the session token in the
  /// environment.
  pub fn from_config(config: &Config) -> Result<Self> {
    let token = Config::get_session_token()?;

    let mut headers = SessionHeaders::new(token);
    if let Some(agent) = &config.api.user_agent {
      headers = headers.with_user_agent(agent.clone());
    }

    let transport = ReqwestTransport::new(config.api.timeout())
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    let requester = Requester::new(Arc::new(transport), Arc::new(headers));
    Ok(Self::new(config.api.url.clone(), requester)?.with_page_limit(config.page_limit))
  }

  pub fn with_page_limit(mut self, limit: u32) -> Self {
    self.page_limit = limit.max(1);
    self
  }

  pub fn requester(&self) -> &Requester {
    &self.requester
  }

  /// Default options for paged listings.
  pub fn page_options(&self) -> PageOptions {
    PageOptions::new().with_limit(self.page_limit)
  }

  /// `{api}/{segments...}`, each segment percent-encoded. `api` is always a
  /// base URL, so the segments are always appended.
  pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
    let mut url = self.api.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  pub(crate) fn message_url(&self, channel_url: &str, message_id: &str) -> Url {
    self.endpoint(&["group_channels", channel_url, "messages", message_id])
  }

  pub(crate) fn chat_url(&self, channel_url: &str) -> Url {
    self.endpoint(&["group_channels", channel_url])
  }

  pub(crate) fn user_url(&self, user_id: &str) -> Url {
    self.endpoint(&["users", user_id])
  }

  pub(crate) fn members_fetcher<T>(&self, channel_url: &str) -> HttpPageFetcher<T> {
    let url = self.endpoint(&["group_channels", channel_url, "members"]);
    HttpPageFetcher::new(self.requester.clone(), url).with_key("members")
  }

  pub fn message(&self, channel_url: &str, message_id: &str) -> Message {
    Message::new(self.clone(), channel_url, message_id)
  }

  pub fn chat(&self, channel_url: &str) -> Chat {
    Chat::new(self.clone(), channel_url)
  }

  pub fn user(&self, user_id: &str, channel_url: &str) -> ChatUser {
    ChatUser::new(self.clone(), user_id, channel_url)
  }
}
