use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Contact and shipping details entered at checkout.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub notes: String,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Phone,
    Address,
    City,
    PostalCode,
    Notes,
}

impl Field {
    pub const REQUIRED: [Field; 6] = [
        Field::Name,
        Field::Email,
        Field::Phone,
        Field::Address,
        Field::City,
        Field::PostalCode,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FieldError {
    Required(Field),
    InvalidEmail,
}

impl FieldError {
    pub fn message(self) -> &'static str {
        match self {
            FieldError::Required(Field::Name) => "Nombre es requerido",
            FieldError::Required(Field::Email) => "Email es requerido",
            FieldError::Required(Field::Phone) => "Teléfono es requerido",
            FieldError::Required(Field::Address) => "Dirección es requerida",
            FieldError::Required(Field::City) => "Ciudad es requerida",
            FieldError::Required(Field::PostalCode) => "Código postal es requerido",
            FieldError::Required(Field::Notes) => "Notas son requeridas",
            FieldError::InvalidEmail => "Email inválido",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Per-field validation failures; empty when the form is valid.
pub type FieldErrors = BTreeMap<Field, FieldError>;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("invalid email regex"))
}

impl CustomerInfo {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Address => &self.address,
            Field::City => &self.city,
            Field::PostalCode => &self.postal_code,
            Field::Notes => &self.notes,
        }
    }

    fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Address => &mut self.address,
            Field::City => &mut self.city,
            Field::PostalCode => &mut self.postal_code,
            Field::Notes => &mut self.notes,
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for field in Field::REQUIRED {
            if self.get(field).trim().is_empty() {
                errors.insert(field, FieldError::Required(field));
            }
        }
        let email = self.email.trim();
        if !email.is_empty() && !email_regex().is_match(email) {
            errors.insert(Field::Email, FieldError::InvalidEmail);
        }
        errors
    }
}

/// The contact form: entered values plus the errors currently shown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    info: CustomerInfo,
    errors: FieldErrors,
}

impl CheckoutForm {
    pub fn new(info: CustomerInfo) -> Self {
        Self {
            info,
            errors: FieldErrors::new(),
        }
    }

    pub fn info(&self) -> &CustomerInfo {
        &self.info
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    /// Update one field; its shown error is cleared until the next validation.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        *self.info.get_mut(field) = value.into();
        self.errors.remove(&field);
    }

    /// Re-validate and remember the errors. Returns `true` when the form is valid.
    pub fn validate(&mut self) -> bool {
        self.errors = self.info.validate();
        if !self.errors.is_empty() {
            let fields: Vec<_> = self.errors.keys().collect();
            tracing::debug!(?fields, "checkout form invalid");
        }
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_info() -> CustomerInfo {
        CustomerInfo {
            name: "Ana Pérez".into(),
            email: "ana@example.com".into(),
            phone: "+34 600 000 000".into(),
            address: "Calle Mayor 1".into(),
            city: "Madrid".into(),
            postal_code: "28013".into(),
            notes: String::new(),
        }
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let errors = CustomerInfo::default().validate();
        assert_eq!(errors.len(), 6);
        assert_eq!(errors[&Field::Name].message(), "Nombre es requerido");
        assert_eq!(errors[&Field::Email].message(), "Email es requerido");
        assert_eq!(errors[&Field::PostalCode].message(), "Código postal es requerido");
        assert!(!errors.contains_key(&Field::Notes));
    }

    #[test]
    fn email_format() {
        let mut info = valid_info();
        info.email = "foo".into();
        assert_eq!(info.validate()[&Field::Email], FieldError::InvalidEmail);
        assert_eq!(FieldError::InvalidEmail.to_string(), "Email inválido");
        info.email = "a@b.com".into();
        assert!(info.validate().is_empty());
        info.email = "   ".into();
        assert_eq!(
            info.validate()[&Field::Email],
            FieldError::Required(Field::Email)
        );
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        let mut info = valid_info();
        info.city = " \t ".into();
        let errors = info.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[&Field::City].message(), "Ciudad es requerida");
    }

    #[test]
    fn set_field_clears_only_that_error() {
        let mut form = CheckoutForm::default();
        assert!(!form.validate());
        assert!(form.error(Field::Phone).is_some());

        form.set_field(Field::Phone, "555");
        assert_eq!(form.error(Field::Phone), None);
        assert!(form.error(Field::Name).is_some());
        assert_eq!(form.info().phone, "555");
    }

    #[test]
    fn valid_form_has_no_errors() {
        let mut form = CheckoutForm::new(valid_info());
        assert!(form.validate());
        assert!(form.errors().is_empty());
    }
}
