//! User account model.
//!
//! A [`User`] is created from a validated [`NewUser`] and carries the stored
//! password. Everything leaving the service goes through [`UserProfile`],
//! which has no password field at all.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::validation::{
    FieldErrors, RegistrationDraft, validate_profile_update, validate_registration,
};

/// Stable numeric user identifier assigned by the repository.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored account password.
///
/// Passwords are kept and compared exactly as submitted. Hashing is an open
/// decision for the service owners, so this type only guarantees the value is
/// wiped on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Wrap a password value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Borrow the raw password, for persistence adapters only.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Compare against a candidate exactly, without trimming.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_str() == candidate
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

fn normalise_phone(phone: Option<&str>) -> Option<String> {
    phone
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Registration input that passed every field rule.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    email: String,
    full_name: String,
    password: Password,
    phone: Option<String>,
    favorite_genres: BTreeSet<String>,
}

impl NewUser {
    /// Validate a draft and capture its values.
    ///
    /// A blank phone is stored as `None`.
    ///
    /// # Examples
    /// ```
    /// use std::collections::BTreeSet;
    /// use backend::domain::NewUser;
    /// use backend::domain::validation::RegistrationDraft;
    ///
    /// let genres = BTreeSet::from(["RPG".to_owned()]);
    /// let user = NewUser::try_from_draft(&RegistrationDraft {
    ///     full_name: "Ana Perez",
    ///     email: "ana@duoc.cl",
    ///     password: "Secret123!",
    ///     phone: Some(""),
    ///     favorite_genres: &genres,
    /// })
    /// .unwrap();
    /// assert!(user.phone().is_none());
    /// ```
    pub fn try_from_draft(draft: &RegistrationDraft<'_>) -> Result<Self, FieldErrors> {
        validate_registration(draft)?;
        Ok(Self {
            email: draft.email.to_owned(),
            full_name: draft.full_name.to_owned(),
            password: Password::new(draft.password),
            phone: normalise_phone(draft.phone),
            favorite_genres: draft.favorite_genres.clone(),
        })
    }

    /// Unique email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Display name.
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }

    /// Submitted password.
    pub fn password(&self) -> &Password {
        &self.password
    }

    /// Optional phone.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Selected favourite genres.
    pub fn favorite_genres(&self) -> &BTreeSet<String> {
        &self.favorite_genres
    }

    /// Attach the repository-assigned identifier.
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            email: self.email,
            full_name: self.full_name,
            password: self.password,
            phone: self.phone,
            favorite_genres: self.favorite_genres,
        }
    }
}

/// Validated change to the mutable profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    full_name: String,
    phone: Option<String>,
}

impl ProfileUpdate {
    /// Validate the new name and phone.
    pub fn try_new(full_name: &str, phone: Option<&str>) -> Result<Self, FieldErrors> {
        validate_profile_update(full_name, phone)?;
        Ok(Self {
            full_name: full_name.to_owned(),
            phone: normalise_phone(phone),
        })
    }

    /// New display name.
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }

    /// New phone, `None` to clear it.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}

/// Stored user account.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    email: String,
    full_name: String,
    password: Password,
    phone: Option<String>,
    favorite_genres: BTreeSet<String>,
}

impl User {
    /// Rehydrate a user from persisted values.
    pub fn from_parts(
        id: UserId,
        email: impl Into<String>,
        full_name: impl Into<String>,
        password: Password,
        phone: Option<String>,
        favorite_genres: BTreeSet<String>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            full_name: full_name.into(),
            password,
            phone,
            favorite_genres,
        }
    }

    /// Identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Unique email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Display name.
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }

    /// Stored password.
    pub fn password(&self) -> &Password {
        &self.password
    }

    /// Optional phone.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Favourite genres.
    pub fn favorite_genres(&self) -> &BTreeSet<String> {
        &self.favorite_genres
    }

    /// Apply a validated profile edit. Email and genres never change here.
    pub fn apply_profile_update(&mut self, update: &ProfileUpdate) {
        self.full_name = update.full_name.clone();
        self.phone = update.phone.clone();
    }

    /// Public projection without the password.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            phone: self.phone.clone(),
            favorite_genres: self.favorite_genres.clone(),
        }
    }
}

/// User representation returned by the API.
///
/// ## Invariants
/// - There is no password field; serialising a profile can never leak one.
///
/// # Examples
/// ```
/// use backend::domain::{UserId, UserProfile};
///
/// let profile = UserProfile {
///     id: UserId::new(1),
///     email: "ana@duoc.cl".into(),
///     full_name: "Ana Perez".into(),
///     phone: None,
///     favorite_genres: Default::default(),
/// };
/// let json = serde_json::to_value(&profile).unwrap();
/// assert_eq!(json["fullName"], "Ana Perez");
/// assert!(json.get("password").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Account identifier.
    #[schema(value_type = i64, example = 1)]
    pub id: UserId,
    /// Unique institutional email.
    #[schema(example = "ana.perez@duoc.cl")]
    pub email: String,
    /// Display name.
    #[schema(example = "Ana Perez")]
    pub full_name: String,
    /// Optional contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "912345678")]
    pub phone: Option<String>,
    /// Favourite genres.
    #[serde(default, alias = "generos")]
    pub favorite_genres: BTreeSet<String>,
}
