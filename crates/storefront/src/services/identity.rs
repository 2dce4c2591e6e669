//! Shopper identity as far as checkout needs it.

/// Contact details of the current shopper.
///
/// Both methods return raw values; checkout trims them and ignores blanks.
pub trait Identity: Send + Sync {
    /// Email of the authenticated user, if signed in.
    fn user_email(&self) -> Option<String>;

    /// Email remembered from an earlier session, used when
    /// [`Identity::user_email`] has nothing.
    fn cached_email(&self) -> Option<String> {
        None
    }
}

/// Identity with fixed values, for front ends that resolve the session up front.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    pub user_email: Option<String>,
    pub cached_email: Option<String>,
}

impl Identity for StaticIdentity {
    fn user_email(&self) -> Option<String> {
        self.user_email.clone()
    }

    fn cached_email(&self) -> Option<String> {
        self.cached_email.clone()
    }
}
