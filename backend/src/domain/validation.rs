//! Field validation shared by the HTTP adapter and the client crate.
//!
//! Each rule is a free function returning the first failing check for its
//! field. Aggregate validators collect every failing field so callers can
//! show one message per input.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Value, json};

/// Maximum characters accepted for a full name.
pub const FULL_NAME_MAX: usize = 100;
/// Maximum characters accepted for an email address.
pub const EMAIL_MAX: usize = 60;
/// Minimum characters required for a password.
pub const PASSWORD_MIN: usize = 10;
/// Maximum characters accepted for a game title.
pub const GAME_TITLE_MAX: usize = 150;
/// Maximum characters accepted for a game genre.
pub const GAME_GENRE_MAX: usize = 50;
/// Maximum characters accepted for a game description.
pub const GAME_DESCRIPTION_MAX: usize = 500;

fn name_regex() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z ]+$")
            .unwrap_or_else(|error| panic!("name regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@duoc\.cl$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn phone_regex() -> &'static Regex {
    static PHONE_RE: OnceLock<Regex> = OnceLock::new();
    PHONE_RE.get_or_init(|| {
        Regex::new(r"^[0-9]{8,12}$")
            .unwrap_or_else(|error| panic!("phone regex failed to compile: {error}"))
    })
}

/// Input field a [`FieldError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// Account holder's full name.
    FullName,
    /// Institutional email address.
    Email,
    /// Account password.
    Password,
    /// Password confirmation typed on the registration form.
    ConfirmPassword,
    /// Optional contact phone.
    Phone,
    /// Favourite genre selection.
    FavoriteGenres,
    /// Game title.
    Title,
    /// Game genre.
    Genre,
    /// Game price.
    Price,
    /// Game description.
    Description,
}

impl Field {
    /// Wire name of the field as it appears in request bodies.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
            Self::Phone => "phone",
            Self::FavoriteGenres => "favoriteGenres",
            Self::Title => "title",
            Self::Genre => "genre",
            Self::Price => "price",
            Self::Description => "description",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failed validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The name is empty or whitespace.
    #[error("full name must not be empty")]
    NameBlank,
    /// The name contains characters other than letters and spaces.
    #[error("full name may only contain letters and spaces")]
    NameInvalidCharacters,
    /// The name exceeds [`FULL_NAME_MAX`] characters.
    #[error("full name must be at most {max} characters")]
    NameTooLong {
        /// Maximum characters allowed.
        max: usize,
    },
    /// The email is empty or whitespace.
    #[error("email must not be empty")]
    EmailBlank,
    /// The email is not an `@duoc.cl` address.
    #[error("email must be an @duoc.cl address")]
    EmailNotInstitutional,
    /// The email exceeds [`EMAIL_MAX`] characters.
    #[error("email must be at most {max} characters")]
    EmailTooLong {
        /// Maximum characters allowed.
        max: usize,
    },
    /// Another account already uses the email.
    #[error("email is already registered")]
    EmailAlreadyRegistered,
    /// The password is shorter than [`PASSWORD_MIN`] characters.
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum characters required.
        min: usize,
    },
    /// The password has no uppercase letter.
    #[error("password must contain an uppercase letter")]
    PasswordMissingUppercase,
    /// The password has no lowercase letter.
    #[error("password must contain a lowercase letter")]
    PasswordMissingLowercase,
    /// The password has no digit.
    #[error("password must contain a digit")]
    PasswordMissingDigit,
    /// The password has no symbol.
    #[error("password must contain a special character")]
    PasswordMissingSymbol,
    /// The confirmation differs from the password.
    #[error("passwords do not match")]
    PasswordMismatch,
    /// The phone is not 8 to 12 digits.
    #[error("phone must contain 8 to 12 digits")]
    PhoneInvalid,
    /// No favourite genre was selected.
    #[error("select at least one favourite genre")]
    GenresEmpty,
    /// The game title is empty or whitespace.
    #[error("title must not be empty")]
    TitleBlank,
    /// The game title exceeds [`GAME_TITLE_MAX`] characters.
    #[error("title must be at most {max} characters")]
    TitleTooLong {
        /// Maximum characters allowed.
        max: usize,
    },
    /// The game genre is empty or whitespace.
    #[error("genre must not be empty")]
    GenreBlank,
    /// The game genre exceeds [`GAME_GENRE_MAX`] characters.
    #[error("genre must be at most {max} characters")]
    GenreTooLong {
        /// Maximum characters allowed.
        max: usize,
    },
    /// The price is negative or not a finite number.
    #[error("price must be a finite, non-negative amount")]
    PriceInvalid,
    /// The description exceeds [`GAME_DESCRIPTION_MAX`] characters.
    #[error("description must be at most {max} characters")]
    DescriptionTooLong {
        /// Maximum characters allowed.
        max: usize,
    },
}

impl FieldError {
    /// Field the failure belongs to.
    pub const fn field(&self) -> Field {
        match self {
            Self::NameBlank | Self::NameInvalidCharacters | Self::NameTooLong { .. } => {
                Field::FullName
            }
            Self::EmailBlank
            | Self::EmailNotInstitutional
            | Self::EmailTooLong { .. }
            | Self::EmailAlreadyRegistered => Field::Email,
            Self::PasswordTooShort { .. }
            | Self::PasswordMissingUppercase
            | Self::PasswordMissingLowercase
            | Self::PasswordMissingDigit
            | Self::PasswordMissingSymbol => Field::Password,
            Self::PasswordMismatch => Field::ConfirmPassword,
            Self::PhoneInvalid => Field::Phone,
            Self::GenresEmpty => Field::FavoriteGenres,
            Self::TitleBlank | Self::TitleTooLong { .. } => Field::Title,
            Self::GenreBlank | Self::GenreTooLong { .. } => Field::Genre,
            Self::PriceInvalid => Field::Price,
            Self::DescriptionTooLong { .. } => Field::Description,
        }
    }

    /// Stable machine-readable code for the failed rule.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NameBlank
            | Self::EmailBlank
            | Self::TitleBlank
            | Self::GenreBlank => "blank",
            Self::NameInvalidCharacters => "invalid_characters",
            Self::NameTooLong { .. }
            | Self::EmailTooLong { .. }
            | Self::TitleTooLong { .. }
            | Self::GenreTooLong { .. }
            | Self::DescriptionTooLong { .. } => "too_long",
            Self::EmailNotInstitutional => "not_institutional",
            Self::EmailAlreadyRegistered => "already_registered",
            Self::PasswordTooShort { .. } => "too_short",
            Self::PasswordMissingUppercase => "missing_uppercase",
            Self::PasswordMissingLowercase => "missing_lowercase",
            Self::PasswordMissingDigit => "missing_digit",
            Self::PasswordMissingSymbol => "missing_symbol",
            Self::PasswordMismatch => "mismatch",
            Self::PhoneInvalid => "invalid_format",
            Self::GenresEmpty => "empty",
            Self::PriceInvalid => "invalid_amount",
        }
    }
}

/// Every failing field of an aggregate validation, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a single rule.
    pub fn check(&mut self, outcome: Result<(), FieldError>) {
        if let Err(err) = outcome {
            self.0.push(err);
        }
    }

    /// Returns `true` when nothing failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the recorded failures.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// First failure recorded for `field`, if any.
    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|err| err.field() == field)
    }

    /// Convert into `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// JSON details attached to HTTP 400 responses.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::validation::{FieldError, FieldErrors};
    ///
    /// let mut errors = FieldErrors::new();
    /// errors.check(Err(FieldError::PhoneInvalid));
    /// let details = errors.to_details();
    /// assert_eq!(details["fields"][0]["field"], "phone");
    /// ```
    pub fn to_details(&self) -> Value {
        let fields: Vec<Value> = self
            .0
            .iter()
            .map(|err| {
                json!({
                    "field": err.field(),
                    "code": err.code(),
                    "message": err.to_string(),
                })
            })
            .collect();
        json!({ "fields": fields })
    }
}

impl From<FieldError> for FieldErrors {
    fn from(value: FieldError) -> Self {
        Self(vec![value])
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for err in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {err}", err.field())?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Validate a full name: non-blank, letters and spaces, at most 100 chars.
pub fn validate_name(name: &str) -> Result<(), FieldError> {
    if name.trim().is_empty() {
        return Err(FieldError::NameBlank);
    }
    if !name_regex().is_match(name) {
        return Err(FieldError::NameInvalidCharacters);
    }
    if name.chars().count() > FULL_NAME_MAX {
        return Err(FieldError::NameTooLong { max: FULL_NAME_MAX });
    }
    Ok(())
}

/// Validate an institutional email address.
///
/// # Examples
/// ```
/// use backend::domain::validation::{FieldError, validate_email};
///
/// assert!(validate_email("ana@duoc.cl").is_ok());
/// assert_eq!(validate_email("ana@gmail.com"), Err(FieldError::EmailNotInstitutional));
/// ```
pub fn validate_email(email: &str) -> Result<(), FieldError> {
    if email.trim().is_empty() {
        return Err(FieldError::EmailBlank);
    }
    if !email_regex().is_match(email) {
        return Err(FieldError::EmailNotInstitutional);
    }
    if email.chars().count() > EMAIL_MAX {
        return Err(FieldError::EmailTooLong { max: EMAIL_MAX });
    }
    Ok(())
}

/// Validate password complexity, reporting the first failing rule.
///
/// Rules are checked in order: length, uppercase, lowercase, digit, symbol.
pub fn validate_password(password: &str) -> Result<(), FieldError> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(FieldError::PasswordTooShort { min: PASSWORD_MIN });
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(FieldError::PasswordMissingUppercase);
    }
    if !password.chars().any(char::is_lowercase) {
        return Err(FieldError::PasswordMissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(FieldError::PasswordMissingDigit);
    }
    if !password.chars().any(|c| !c.is_alphanumeric()) {
        return Err(FieldError::PasswordMissingSymbol);
    }
    Ok(())
}

/// Validate that the confirmation matches the password exactly.
pub fn validate_confirm_password(confirm: &str, password: &str) -> Result<(), FieldError> {
    if confirm == password {
        Ok(())
    } else {
        Err(FieldError::PasswordMismatch)
    }
}

/// Validate an optional phone number; blank input passes.
pub fn validate_phone(phone: &str) -> Result<(), FieldError> {
    if phone.trim().is_empty() || phone_regex().is_match(phone) {
        Ok(())
    } else {
        Err(FieldError::PhoneInvalid)
    }
}

/// Validate that at least one genre is selected.
pub fn validate_genres(selected: &BTreeSet<String>) -> Result<(), FieldError> {
    if selected.is_empty() {
        Err(FieldError::GenresEmpty)
    } else {
        Ok(())
    }
}

/// Raw registration input prior to validation.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationDraft<'a> {
    /// Full name as typed.
    pub full_name: &'a str,
    /// Email as typed.
    pub email: &'a str,
    /// Password as typed.
    pub password: &'a str,
    /// Optional phone; `None` and blank are equivalent.
    pub phone: Option<&'a str>,
    /// Selected favourite genres.
    pub favorite_genres: &'a BTreeSet<String>,
}

/// Run every registration rule and collect each failing field.
pub fn validate_registration(draft: &RegistrationDraft<'_>) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.check(validate_name(draft.full_name));
    errors.check(validate_email(draft.email));
    errors.check(validate_password(draft.password));
    errors.check(validate_phone(draft.phone.unwrap_or_default()));
    errors.check(validate_genres(draft.favorite_genres));
    errors.into_result()
}

/// Validate a profile edit of the mutable fields.
pub fn validate_profile_update(full_name: &str, phone: Option<&str>) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.check(validate_name(full_name));
    errors.check(validate_phone(phone.unwrap_or_default()));
    errors.into_result()
}

/// Validate a game title.
pub fn validate_game_title(title: &str) -> Result<(), FieldError> {
    if title.trim().is_empty() {
        return Err(FieldError::TitleBlank);
    }
    if title.chars().count() > GAME_TITLE_MAX {
        return Err(FieldError::TitleTooLong { max: GAME_TITLE_MAX });
    }
    Ok(())
}

/// Validate a game genre label.
pub fn validate_game_genre(genre: &str) -> Result<(), FieldError> {
    if genre.trim().is_empty() {
        return Err(FieldError::GenreBlank);
    }
    if genre.chars().count() > GAME_GENRE_MAX {
        return Err(FieldError::GenreTooLong { max: GAME_GENRE_MAX });
    }
    Ok(())
}

/// Validate a game price.
pub fn validate_price(price: f64) -> Result<(), FieldError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(FieldError::PriceInvalid)
    }
}

/// Validate an optional game description.
pub fn validate_description(description: Option<&str>) -> Result<(), FieldError> {
    match description {
        Some(text) if text.chars().count() > GAME_DESCRIPTION_MAX => {
            Err(FieldError::DescriptionTooLong {
                max: GAME_DESCRIPTION_MAX,
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    //! Rule-by-rule coverage for the validators.
    use super::*;
    use rstest::rstest;

    fn genres(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[rstest]
    #[case("Ana Perez", Ok(()))]
    #[case("", Err(FieldError::NameBlank))]
    #[case("   ", Err(FieldError::NameBlank))]
    #[case("Ana3", Err(FieldError::NameInvalidCharacters))]
    #[case("Ana-Maria", Err(FieldError::NameInvalidCharacters))]
    fn name_rules(#[case] input: &str, #[case] expected: Result<(), FieldError>) {
        assert_eq!(validate_name(input), expected);
    }

    #[rstest]
    fn name_length_boundary() {
        assert!(validate_name(&"a".repeat(FULL_NAME_MAX)).is_ok());
        assert_eq!(
            validate_name(&"a".repeat(FULL_NAME_MAX + 1)),
            Err(FieldError::NameTooLong { max: FULL_NAME_MAX })
        );
    }

    #[rstest]
    #[case("ana.perez@duoc.cl", Ok(()))]
    #[case("", Err(FieldError::EmailBlank))]
    #[case("ana@gmail.com", Err(FieldError::EmailNotInstitutional))]
    #[case("ana@duoc.cl.evil", Err(FieldError::EmailNotInstitutional))]
    #[case("@duoc.cl", Err(FieldError::EmailNotInstitutional))]
    fn email_rules(#[case] input: &str, #[case] expected: Result<(), FieldError>) {
        assert_eq!(validate_email(input), expected);
    }

    #[rstest]
    fn email_length_is_checked_after_format() {
        let local = "a".repeat(EMAIL_MAX);
        assert_eq!(
            validate_email(&format!("{local}@duoc.cl")),
            Err(FieldError::EmailTooLong { max: EMAIL_MAX })
        );
    }

    #[rstest]
    #[case("Abcdefgh1!", Ok(()))]
    #[case("Abcdefghi1!", Ok(()))]
    #[case("short1!", Err(FieldError::PasswordTooShort { min: PASSWORD_MIN }))]
    #[case("Abc1!", Err(FieldError::PasswordTooShort { min: PASSWORD_MIN }))]
    #[case("abcdefgh1!", Err(FieldError::PasswordMissingUppercase))]
    #[case("ABCDEFGH1!", Err(FieldError::PasswordMissingLowercase))]
    #[case("Abcdefghi!", Err(FieldError::PasswordMissingDigit))]
    #[case("Abcdefghi1", Err(FieldError::PasswordMissingSymbol))]
    #[case("abc", Err(FieldError::PasswordTooShort { min: PASSWORD_MIN }))]
    fn password_rules_in_order(#[case] input: &str, #[case] expected: Result<(), FieldError>) {
        assert_eq!(validate_password(input), expected);
    }

    #[rstest]
    #[case("", Ok(()))]
    #[case("  ", Ok(()))]
    #[case("12345678", Ok(()))]
    #[case("123456789012", Ok(()))]
    #[case("1234567", Err(FieldError::PhoneInvalid))]
    #[case("1234567890123", Err(FieldError::PhoneInvalid))]
    #[case("+56912345678", Err(FieldError::PhoneInvalid))]
    fn phone_rules(#[case] input: &str, #[case] expected: Result<(), FieldError>) {
        assert_eq!(validate_phone(input), expected);
    }

    #[rstest]
    #[case("Secret123!", "Secret123!", true)]
    #[case("", "", true)]
    #[case("secret123!", "Secret123!", false)]
    #[case("", "Secret123!", false)]
    #[case("Secret123!", "", false)]
    #[case("Secret123! ", "Secret123!", false)]
    #[case(" Secret123!", "Secret123!", false)]
    fn confirm_password_requires_exact_match(
        #[case] confirm: &str,
        #[case] password: &str,
        #[case] matches: bool,
    ) {
        let expected = if matches {
            Ok(())
        } else {
            Err(FieldError::PasswordMismatch)
        };
        assert_eq!(validate_confirm_password(confirm, password), expected);
    }

    #[rstest]
    fn genres_must_not_be_empty() {
        assert_eq!(validate_genres(&BTreeSet::new()), Err(FieldError::GenresEmpty));
        assert!(validate_genres(&genres(&["RPG"])).is_ok());
    }

    #[rstest]
    fn registration_collects_every_failing_field() {
        let selected = BTreeSet::new();
        let draft = RegistrationDraft {
            full_name: "Ana 3",
            email: "ana@gmail.com",
            password: "short",
            phone: Some("12"),
            favorite_genres: &selected,
        };

        let errors = validate_registration(&draft).expect_err("draft is invalid");

        let fields: Vec<Field> = errors.iter().map(FieldError::field).collect();
        assert_eq!(
            fields,
            vec![
                Field::FullName,
                Field::Email,
                Field::Password,
                Field::Phone,
                Field::FavoriteGenres
            ]
        );
    }

    #[rstest]
    fn registration_accepts_valid_draft_without_phone() {
        let selected = genres(&["RPG", "Terror"]);
        let draft = RegistrationDraft {
            full_name: "Ana Perez",
            email: "ana@duoc.cl",
            password: "Abcdefgh1!",
            phone: None,
            favorite_genres: &selected,
        };
        assert!(validate_registration(&draft).is_ok());
    }

    #[rstest]
    fn profile_update_checks_name_and_phone() {
        let errors = validate_profile_update("", Some("abc")).expect_err("invalid");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.for_field(Field::FullName), Some(&FieldError::NameBlank));
        assert_eq!(errors.for_field(Field::Phone), Some(&FieldError::PhoneInvalid));
    }

    #[rstest]
    #[case(0.0, true)]
    #[case(59.99, true)]
    #[case(-1.0, false)]
    #[case(f64::NAN, false)]
    #[case(f64::INFINITY, false)]
    fn price_rules(#[case] price: f64, #[case] ok: bool) {
        assert_eq!(validate_price(price).is_ok(), ok);
    }

    #[rstest]
    fn game_text_limits() {
        assert_eq!(validate_game_title(" "), Err(FieldError::TitleBlank));
        assert!(validate_game_title(&"t".repeat(GAME_TITLE_MAX)).is_ok());
        assert_eq!(
            validate_game_genre(&"g".repeat(GAME_GENRE_MAX + 1)),
            Err(FieldError::GenreTooLong { max: GAME_GENRE_MAX })
        );
        assert!(validate_description(None).is_ok());
        assert!(
            validate_description(Some(&"d".repeat(GAME_DESCRIPTION_MAX + 1))).is_err()
        );
    }

    #[rstest]
    fn details_list_field_code_and_message() {
        let errors = FieldErrors::from(FieldError::GenresEmpty);
        let details = errors.to_details();
        assert_eq!(details["fields"][0]["field"], "favoriteGenres");
        assert_eq!(details["fields"][0]["code"], "empty");
        assert_eq!(
            details["fields"][0]["message"],
            "select at least one favourite genre"
        );
    }
}
