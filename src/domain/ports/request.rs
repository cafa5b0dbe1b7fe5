use serde_json::{Map, Value};

use crate::domain::UserId;

/// Read-only view of the incoming request, as seen before the handler runs.
pub trait RequestAccessor {
    fn url(&self) -> String;
    fn method(&self) -> String;
    /// Request parameters, or `None` when the request carried none.
    fn input(&self) -> Option<Map<String, Value>>;
    fn ip(&self) -> String;
}

/// Resolves the authenticated user, if any.
pub trait AuthAccessor {
    fn user_id(&self) -> Option<UserId>;
}

impl<T: AuthAccessor> AuthAccessor for Option<T> {
    fn user_id(&self) -> Option<UserId> {
        self.as_ref().and_then(AuthAccessor::user_id)
    }
}
