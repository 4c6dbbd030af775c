//! Payment method labels.
//!
//! Invoices and payments reference a method either through the catalog or
//! as free text. Reports group by a single normalized label so that
//! `"Cash "`, `"cash"` and a catalog entry named `"CASH"` land together.

use backoffice_shared::types::PaymentMethodId;

use super::error::CreditError;
use super::types::{PaymentMethodRef, ResolvedMethod};

/// Label of invoices billed on a credit account.
pub const CREDIT_ACCOUNT_LABEL: &str = "credit account";

/// Label used when no method is known.
pub const UNSPECIFIED_LABEL: &str = "unspecified";

/// Longest method name, in characters, for catalog entries and free text.
pub const MAX_METHOD_NAME_LEN: usize = 100;

/// Checks a method name as it will be stored: trimmed, not blank and at most
/// [`MAX_METHOD_NAME_LEN`] characters.
///
/// # Errors
///
/// Returns `CreditError::InvalidMethod` otherwise.
pub fn check_method_name(raw: &str) -> Result<(), CreditError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CreditError::InvalidMethod("blank method name".to_string()));
    }
    if name.chars().count() > MAX_METHOD_NAME_LEN {
        return Err(CreditError::InvalidMethod(format!(
            "method name longer than {MAX_METHOD_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Trims and lower-cases a method or seller name.
#[must_use]
pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Returns true if the normalized label is the credit account label.
#[must_use]
pub fn is_credit_account_label(label: &str) -> bool {
    normalize_label(label) == CREDIT_ACCOUNT_LABEL
}

impl PaymentMethodRef {
    /// The placeholder stored on invoices whose method is not known yet.
    #[must_use]
    pub fn unspecified() -> Self {
        Self::Manual(UNSPECIFIED_LABEL.to_string())
    }

    /// Returns true for a free-text method that carries no information.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        match self {
            Self::Known(_) => false,
            Self::Manual(text) => {
                let label = normalize_label(text);
                label.is_empty() || label == UNSPECIFIED_LABEL
            }
        }
    }

    /// Computes the normalized label, looking catalog names up with `lookup`.
    ///
    /// Unresolvable catalog entries and empty text fall back to
    /// [`UNSPECIFIED_LABEL`].
    pub fn label<F>(&self, lookup: F) -> String
    where
        F: Fn(PaymentMethodId) -> Option<String>,
    {
        let label = match self {
            Self::Known(id) => lookup(*id).map(|name| normalize_label(&name)),
            Self::Manual(text) => Some(normalize_label(text)),
        };
        match label {
            Some(label) if !label.is_empty() => label,
            _ => UNSPECIFIED_LABEL.to_string(),
        }
    }

    /// Builds a reference from the two nullable storage columns.
    ///
    /// The catalog id wins when both are populated.
    #[must_use]
    pub fn from_columns(id: Option<uuid::Uuid>, manual: Option<String>) -> Option<Self> {
        match (id, manual) {
            (Some(id), _) => Some(Self::Known(PaymentMethodId::from_uuid(id))),
            (None, Some(text)) => Some(Self::Manual(text)),
            (None, None) => None,
        }
    }

    /// Splits the reference into the two nullable storage columns.
    #[must_use]
    pub fn to_columns(&self) -> (Option<uuid::Uuid>, Option<String>) {
        match self {
            Self::Known(id) => (Some(id.into_inner()), None),
            Self::Manual(text) => (None, Some(text.trim().to_string())),
        }
    }
}

/// Label of an optional reference; `None` is [`UNSPECIFIED_LABEL`].
pub fn label_of<F>(reference: Option<&PaymentMethodRef>, lookup: F) -> String
where
    F: Fn(PaymentMethodId) -> Option<String>,
{
    reference.map_or_else(|| UNSPECIFIED_LABEL.to_string(), |r| r.label(lookup))
}

impl ResolvedMethod {
    /// Resolves a reference used for a new payment or invoice.
    ///
    /// Catalog references must exist (`lookup` returns `Some`); free text
    /// must pass [`check_method_name`].
    ///
    /// # Errors
    ///
    /// Returns `CreditError::InvalidMethod` if the reference cannot be resolved.
    pub fn resolve<F>(reference: PaymentMethodRef, lookup: F) -> Result<Self, CreditError>
    where
        F: Fn(PaymentMethodId) -> Option<String>,
    {
        let label = match &reference {
            PaymentMethodRef::Known(id) => {
                lookup(*id)
                    .map(|name| normalize_label(&name))
                    .filter(|label| !label.is_empty())
                    .ok_or_else(|| CreditError::InvalidMethod(id.to_string()))?
            }
            PaymentMethodRef::Manual(text) => {
                check_method_name(text)?;
                normalize_label(text)
            }
        };
        Ok(Self { reference, label })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn catalog(id: PaymentMethodId) -> impl Fn(PaymentMethodId) -> Option<String> {
        move |lookup| (lookup == id).then(|| "  Credit Account ".to_string())
    }

    #[rstest]
    #[case("  Cash ", "cash")]
    #[case("CREDIT ACCOUNT", "credit account")]
    #[case("", "")]
    fn test_normalize_label(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_label(raw), expected);
    }

    #[test]
    fn test_known_label_uses_catalog_name() {
        let id = PaymentMethodId::new();
        let reference = PaymentMethodRef::Known(id);
        assert_eq!(reference.label(catalog(id)), CREDIT_ACCOUNT_LABEL);
        assert!(is_credit_account_label(&reference.label(catalog(id))));
    }

    #[test]
    fn test_unknown_catalog_entry_is_unspecified() {
        let reference = PaymentMethodRef::Known(PaymentMethodId::new());
        assert_eq!(reference.label(|_| None), UNSPECIFIED_LABEL);
    }

    #[test]
    fn test_missing_reference_is_unspecified() {
        assert_eq!(label_of(None, |_| None), UNSPECIFIED_LABEL);
        let manual = PaymentMethodRef::Manual("   ".into());
        assert_eq!(label_of(Some(&manual), |_| None), UNSPECIFIED_LABEL);
    }

    #[rstest]
    #[case(PaymentMethodRef::unspecified(), true)]
    #[case(PaymentMethodRef::Manual("  ".into()), true)]
    #[case(PaymentMethodRef::Manual("Unspecified".into()), true)]
    #[case(PaymentMethodRef::Manual("cash".into()), false)]
    #[case(PaymentMethodRef::Known(PaymentMethodId::new()), false)]
    fn test_is_placeholder(#[case] reference: PaymentMethodRef, #[case] expected: bool) {
        assert_eq!(reference.is_placeholder(), expected);
    }

    #[test]
    fn test_columns_round_trip_prefers_catalog() {
        let id = PaymentMethodId::new();
        let reference =
            PaymentMethodRef::from_columns(Some(id.into_inner()), Some("cash".into())).unwrap();
        assert_eq!(reference, PaymentMethodRef::Known(id));
        assert_eq!(reference.to_columns(), (Some(id.into_inner()), None));
        assert!(PaymentMethodRef::from_columns(None, None).is_none());
    }

    #[test]
    fn test_resolve_rejects_unknown_catalog_entry() {
        let err = ResolvedMethod::resolve(PaymentMethodRef::Known(PaymentMethodId::new()), |_| {
            None
        })
        .unwrap_err();
        assert!(matches!(err, CreditError::InvalidMethod(_)));
    }

    #[test]
    fn test_resolve_rejects_blank_text() {
        let err = ResolvedMethod::resolve(PaymentMethodRef::Manual(" ".into()), |_| None)
            .unwrap_err();
        assert!(matches!(err, CreditError::InvalidMethod(_)));
    }

    #[rstest]
    #[case(" cash ", true)]
    #[case("   ", false)]
    #[case(&"x".repeat(MAX_METHOD_NAME_LEN), true)]
    #[case(&format!("  {}  ", "x".repeat(MAX_METHOD_NAME_LEN)), true)]
    #[case(&"x".repeat(MAX_METHOD_NAME_LEN + 1), false)]
    fn test_check_method_name(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(check_method_name(raw).is_ok(), ok);
    }

    #[test]
    fn test_resolve_rejects_overlong_text() {
        let text = "t".repeat(MAX_METHOD_NAME_LEN + 1);
        let err = ResolvedMethod::resolve(PaymentMethodRef::Manual(text), |_| None).unwrap_err();
        assert!(matches!(err, CreditError::InvalidMethod(_)));
    }

    #[test]
    fn test_resolve_manual() {
        let resolved =
            ResolvedMethod::resolve(PaymentMethodRef::Manual(" Cash".into()), |_| None).unwrap();
        assert_eq!(resolved.label, "cash");
    }
}
