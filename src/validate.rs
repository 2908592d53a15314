//! Field-level validation of user forms.
//!
//! Two profiles exist:
//! - [`validate_create`] stops at the first failing rule and reports a single message.
//!   It also checks the address fields.
//! - [`validate_edit`] reports every failing field at once and only looks at
//!   name, email and phone.
//!
//! Both are pure: no I/O, no state.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Address, Company, PHONE_DIGITS, UserDraft, UserRecord};

/// Minimum number of characters in a user name.
pub const MIN_NAME_LEN: usize = 3;

pub const CREATE_NAME_MSG: &str = "Name is required and should be at least 3 characters";
pub const CREATE_EMAIL_MSG: &str = "Valid email is required";
pub const CREATE_PHONE_MSG: &str = "Valid phone number is required";
pub const CREATE_ADDRESS_MSG: &str = "Address (street and city) is required";

pub const EDIT_NAME_MSG: &str = "Name is required and should be at least 3 characters.";
pub const EDIT_EMAIL_MSG: &str = "A valid email is required.";
pub const EDIT_PHONE_MSG: &str = "Phone number is required and should be exactly 10 digits.";

/// Form fields that carry validation rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Phone,
    Street,
    City,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Street => "street",
            Field::City => "city",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first rule a create form broke.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

/// Every failing field of an edit form with its message. Empty means valid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }
}

/// Input of the create dialog, assembled before submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub company_name: String,
}

impl UserForm {
    /// Build the draft sent to the gateway. A blank company name becomes `None`.
    pub fn to_draft(&self) -> UserDraft {
        let company_name = if self.company_name.is_empty() {
            None
        } else {
            Some(self.company_name.clone())
        };
        UserDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            website: None,
            address: Address {
                street: self.street.clone(),
                city: self.city.clone(),
                ..Address::default()
            },
            company: Company {
                name: company_name,
                ..Company::default()
            },
        }
    }
}

/// Input of the edit dialog: the three editable fields of an existing record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditForm {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl EditForm {
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            name: record.name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
        }
    }

    /// Copy of `record` with the edited fields applied; everything else is kept.
    pub fn apply_to(&self, record: &UserRecord) -> UserRecord {
        UserRecord {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            ..record.clone()
        }
    }
}

/// Check a create form, returning the first failing rule.
///
/// Rules run in order: name, email, phone, address. The company name is optional.
pub fn validate_create(form: &UserForm) -> Result<(), FieldError> {
    if !is_valid_name(&form.name) {
        return Err(FieldError {
            field: Field::Name,
            message: CREATE_NAME_MSG,
        });
    }
    if !is_valid_email(&form.email) {
        return Err(FieldError {
            field: Field::Email,
            message: CREATE_EMAIL_MSG,
        });
    }
    if !is_valid_phone(&form.phone) {
        return Err(FieldError {
            field: Field::Phone,
            message: CREATE_PHONE_MSG,
        });
    }
    if form.street.is_empty() || form.city.is_empty() {
        let field = if form.street.is_empty() {
            Field::Street
        } else {
            Field::City
        };
        return Err(FieldError {
            field,
            message: CREATE_ADDRESS_MSG,
        });
    }
    Ok(())
}

/// Check an edit form, collecting every failing field.
pub fn validate_edit(form: &EditForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if !is_valid_name(&form.name) {
        errors.insert(Field::Name, EDIT_NAME_MSG);
    }
    if !is_valid_email(&form.email) {
        errors.insert(Field::Email, EDIT_EMAIL_MSG);
    }
    if !is_valid_phone(&form.phone) {
        errors.insert(Field::Phone, EDIT_PHONE_MSG);
    }
    errors
}

/// At least three characters. Whitespace counts.
pub fn is_valid_name(name: &str) -> bool {
    name.chars().count() >= MIN_NAME_LEN
}

/// Exactly ten ASCII digits, nothing else.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == PHONE_DIGITS && phone.bytes().all(|b| b.is_ascii_digit())
}

/// Loose `x@y.z` shape check.
///
/// Somewhere in the input there must be a run of non-whitespace characters with
/// at least one character before an `@`, at least one character between the `@`
/// and a later `.`, and at least one character after that `.`.
pub fn is_valid_email(email: &str) -> bool {
    email.split(char::is_whitespace).any(|token| {
        let chars: Vec<char> = token.chars().collect();
        // The leftmost usable '@' leaves the widest span for the dot.
        let Some(at) = chars.iter().skip(1).position(|&c| c == '@').map(|p| p + 1) else {
            return false;
        };
        let last = chars.len().saturating_sub(1);
        chars
            .iter()
            .enumerate()
            .any(|(i, &c)| c == '.' && i >= at + 2 && i < last)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_form(name: &str, email: &str, phone: &str, street: &str, city: &str) -> UserForm {
        UserForm {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            street: street.into(),
            city: city.into(),
            company_name: String::new(),
        }
    }

    #[test]
    fn create_accepts_complete_form() {
        let form = create_form("Alice", "a@b.com", "1234567890", "Main", "Metropolis");
        assert_eq!(validate_create(&form), Ok(()));
    }

    #[test]
    fn create_reports_name_first() {
        let form = create_form("Al", "a@b.com", "1234567890", "Main", "Metropolis");
        let err = validate_create(&form).unwrap_err();
        assert_eq!(err.field, Field::Name);
        assert_eq!(err.to_string(), CREATE_NAME_MSG);

        // Every other field broken too: still the name message.
        let form = create_form("", "", "", "", "");
        assert_eq!(validate_create(&form).unwrap_err().message, CREATE_NAME_MSG);
    }

    #[test]
    fn create_walks_rules_in_order() {
        let form = create_form("Alice", "nope", "12", "", "");
        assert_eq!(validate_create(&form).unwrap_err().message, CREATE_EMAIL_MSG);

        let form = create_form("Alice", "a@b.com", "12345678901", "", "");
        assert_eq!(validate_create(&form).unwrap_err().message, CREATE_PHONE_MSG);

        let form = create_form("Alice", "a@b.com", "1234567890", "", "Metropolis");
        let err = validate_create(&form).unwrap_err();
        assert_eq!((err.field, err.message), (Field::Street, CREATE_ADDRESS_MSG));

        let form = create_form("Alice", "a@b.com", "1234567890", "Main", "");
        let err = validate_create(&form).unwrap_err();
        assert_eq!((err.field, err.message), (Field::City, CREATE_ADDRESS_MSG));
    }

    #[test]
    fn create_ignores_company_name() {
        let mut form = create_form("Alice", "a@b.com", "1234567890", "Main", "Metropolis");
        form.company_name = "  ".into();
        assert!(validate_create(&form).is_ok());
    }

    #[test]
    fn edit_collects_all_failures() {
        let form = EditForm {
            name: "Bob".into(),
            email: "not-an-email".into(),
            phone: "123".into(),
        };
        let errors = validate_edit(&form);
        assert_eq!(errors.len(), 2);
        assert!(!errors.contains(Field::Name));
        assert_eq!(errors.get(Field::Email), Some(EDIT_EMAIL_MSG));
        assert_eq!(errors.get(Field::Phone), Some(EDIT_PHONE_MSG));
    }

    #[test]
    fn edit_valid_form_has_no_errors() {
        let form = EditForm {
            name: "Bob".into(),
            email: "bob@example.org".into(),
            phone: "0123456789".into(),
        };
        assert!(validate_edit(&form).is_empty());

        let all_bad = validate_edit(&EditForm::default());
        assert_eq!(
            all_bad.fields().collect::<Vec<_>>(),
            vec![Field::Name, Field::Email, Field::Phone]
        );
        assert_eq!(all_bad.get(Field::Name), Some(EDIT_NAME_MSG));
    }

    #[test]
    fn email_shape() {
        for ok in ["a@b.c", "first.last@sub.example.com", "x a@b.c", "a@b..", "@a@b.c"] {
            assert!(is_valid_email(ok), "{ok} should pass");
        }
        for bad in ["", "a@b", "@b.c", "a@.c", "a@b.", "a @b.c", "a@ b.c", "abc"] {
            assert!(!is_valid_email(bad), "{bad} should fail");
        }
    }

    #[test]
    fn phone_needs_exactly_ten_ascii_digits() {
        assert!(is_valid_phone("0123456789"));
        assert!(!is_valid_phone("012345678"));
        assert!(!is_valid_phone("012-345-6789"));
        assert!(!is_valid_phone("０１２３４５６７８９"));
        assert!(!is_valid_phone("0123456789\n"));
    }

    #[test]
    fn name_counts_characters_not_bytes() {
        assert!(is_valid_name("Zoë"));
        assert!(!is_valid_name("Zö"));
        assert!(is_valid_name("   "));
    }

    #[test]
    fn form_to_draft_maps_blank_company_to_none() {
        let mut form = create_form("Alice", "a@b.com", "1234567890", "Main", "Metropolis");
        let draft = form.to_draft();
        assert_eq!(draft.company.name, None);
        assert_eq!(draft.address.city, "Metropolis");
        form.company_name = "Acme".into();
        assert_eq!(form.to_draft().company.name.as_deref(), Some("Acme"));
    }

    #[test]
    fn edit_form_keeps_untouched_fields() {
        let record = UserRecord {
            id: 7,
            name: "Old".into(),
            website: Some("old.example".into()),
            ..UserRecord::default()
        };
        let mut form = EditForm::from_record(&record);
        form.name = "New name".into();
        let updated = form.apply_to(&record);
        assert_eq!(updated.id, 7);
        assert_eq!(updated.name, "New name");
        assert_eq!(updated.website.as_deref(), Some("old.example"));
    }
}
