use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::cache::token::{Token, TokenPolicy};
use crate::error::GatewayError;
use crate::upstream::login::{CredentialLogin, FetchToken};

#[derive(Debug, Default)]
struct TokenState {
    token: Option<Token>,
    /// bumped after every login attempt, successful or not
    epoch: u64,
    last_error: Option<GatewayError>,
}

/// Single shared bearer token for the whole process.
///
/// Reads go through the `RwLock`; logins are serialized by `login_lock`, which
/// is held for the whole network round trip. Callers that queued behind a
/// login observe its outcome instead of starting another one.
#[derive(Debug)]
pub struct TokenCache<S = CredentialLogin> {
    source: S,
    policy: TokenPolicy,
    state: RwLock<TokenState>,
    login_lock: Mutex<()>,
}

impl<S: FetchToken> TokenCache<S> {
    pub fn new(source: S, policy: TokenPolicy) -> Self {
        Self {
            source,
            policy,
            state: RwLock::new(TokenState::default()),
            login_lock: Mutex::new(()),
        }
    }

    /// Returns a token that is unexpired according to the policy, logging in
    /// first when there is none or it reached its expiry instant.
    pub async fn ensure_valid_token(&self) -> Result<String, GatewayError> {
        let seen_epoch = {
            let state = self.state.read().await;
            if let Some(token) = state.token.as_ref().filter(|t| t.is_valid()) {
                return Ok(token.value.clone());
            }
            state.epoch
        };

        let _guard = self.login_lock.lock().await;
        {
            let state = self.state.read().await;
            if state.epoch != seen_epoch {
                // a login finished while we were waiting for the lock
                if let Some(token) = state.token.as_ref().filter(|t| t.is_valid()) {
                    return Ok(token.value.clone());
                }
                if let Some(err) = &state.last_error {
                    debug!("reusing failure of concurrent login: {}", err);
                    return Err(err.clone());
                }
            }
        }
        self.login().await
    }

    /// Unconditionally replaces the cached token.
    pub async fn force_login(&self) -> Result<String, GatewayError> {
        let _guard = self.login_lock.lock().await;
        self.login().await
    }

    /// Whether a token has been obtained, regardless of its expiry.
    pub async fn has_token(&self) -> bool {
        self.state.read().await.token.is_some()
    }

    pub async fn clear(&self) {
        self.state.write().await.token = None;
    }

    /// Must only be called while holding `login_lock`.
    async fn login(&self) -> Result<String, GatewayError> {
        let outcome = self.source.fetch_token().await;

        let mut state = self.state.write().await;
        state.epoch += 1;
        match outcome {
            Ok(value) => {
                let token = Token::issue(value, &self.policy);
                info!(
                    "token cached for ~{}s",
                    self.policy.usable_for().as_secs()
                );
                state.token = Some(token.clone());
                state.last_error = None;
                Ok(token.value)
            }
            Err(err) => {
                warn!("login failed: {}", err);
                state.last_error = Some(err.clone());
                Err(err)
            }
        }
    }
}
