use std::future::Future;

use tracing::{info, warn};

/// Responses that can tell whether upstream rejected the bearer token.
pub trait Unauthorized {
    fn is_unauthorized(&self) -> bool;
}

impl Unauthorized for reqwest::Response {
    fn is_unauthorized(&self) -> bool {
        self.status() == reqwest::StatusCode::UNAUTHORIZED
    }
}

/// Result of one logical authenticated call. There are at most two attempts.
#[derive(Debug)]
pub enum CallOutcome<R> {
    /// first attempt was not rejected, whatever its status
    First(R),
    /// first attempt got 401, the retry with a fresh token was accepted
    RetrySucceeded(R),
    /// both attempts got 401
    RetryRejected(R),
}

impl<R> CallOutcome<R> {
    pub fn into_inner(self) -> R {
        match self {
            CallOutcome::First(r) | CallOutcome::RetrySucceeded(r) | CallOutcome::RetryRejected(r) => r,
        }
    }

    pub fn was_retried(&self) -> bool {
        !matches!(self, CallOutcome::First(_))
    }
}

/// Sends with `token`; on 401 obtains a new token through `relogin` and sends
/// exactly once more. Errors from either step are returned untouched.
pub async fn run_with_reauth<R, E, SendFn, SendFut, Relogin, ReloginFut>(
    token: String,
    mut send: SendFn,
    relogin: Relogin,
) -> Result<CallOutcome<R>, E>
where
    R: Unauthorized,
    SendFn: FnMut(String) -> SendFut,
    SendFut: Future<Output = Result<R, E>>,
    Relogin: FnOnce() -> ReloginFut,
    ReloginFut: Future<Output = Result<String, E>>,
{
    let first = send(token).await?;
    if !first.is_unauthorized() {
        return Ok(CallOutcome::First(first));
    }

    info!("upstream rejected the token, logging in again");
    let fresh = relogin().await?;
    let second = send(fresh).await?;
    if second.is_unauthorized() {
        warn!("upstream rejected a freshly issued token");
        Ok(CallOutcome::RetryRejected(second))
    } else {
        Ok(CallOutcome::RetrySucceeded(second))
    }
}
