//! Transition Validation
//!
//! Checks a proposed status change against the context the user supplied.
//! Two-phase evaluation:
//! 1. Edge check against the active policy (always passes when permissive)
//! 2. Required context fields for the TARGET status
//!
//! Failures are returned as `ValidationResult::Rejected` values so callers can
//! render field-level feedback without error plumbing.

use serde::Serialize;
use std::fmt;

use crate::context::{ContextField, TransitionContext};
use crate::policy::LifecyclePolicy;
use crate::status::LifecycleStatus;

/// Built-in required context fields per target status
pub fn default_requirements(status: LifecycleStatus) -> &'static [ContextField] {
    use ContextField::*;

    match status {
        LifecycleStatus::CheckedOut => &[To],
        LifecycleStatus::WithProps => &[Notes, DueBackDate],
        LifecycleStatus::WithMaker => &[MakerName, DueBackDate],
        LifecycleStatus::DamagedAwaitingRepair | LifecycleStatus::DamagedAwaitingReplacement => {
            &[Notes, DamagePhoto]
        }
        LifecycleStatus::OnDelivery => &[DeliveryDate, DeliveryVenue],
        LifecycleStatus::UnderReview => &[Notes],
        LifecycleStatus::Backup => &[WhoHasBackup],
        LifecycleStatus::Cut => &[Notes],
        _ => &[],
    }
}

/// Why a transition was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    MissingCheckoutRecipient,
    MissingField,
    MissingDamageEvidence,
    UnknownStatus,
    ForbiddenTransition,
}

/// A rejected transition with a message fit for the end user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    pub kind: RejectionKind,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<ContextField>,
}

impl Rejection {
    fn new(kind: RejectionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            missing_fields: Vec::new(),
        }
    }

    fn missing(kind: RejectionKind, message: impl Into<String>, fields: Vec<ContextField>) -> Self {
        Self {
            kind,
            message: message.into(),
            missing_fields: fields,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A transition that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct Accepted {
    /// Status the prop moves to
    pub new_status: LifecycleStatus,
    /// Trimmed context with blank values removed
    pub normalized_context: TransitionContext,
}

/// Outcome of validating a proposed status change
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Accepted(Accepted),
    Rejected(Rejection),
}

impl ValidationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationResult::Accepted(_))
    }

    pub fn accepted(&self) -> Option<&Accepted> {
        match self {
            ValidationResult::Accepted(a) => Some(a),
            ValidationResult::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            ValidationResult::Accepted(_) => None,
            ValidationResult::Rejected(r) => Some(r),
        }
    }

    /// Convert into a `Result`, for callers that want `?`
    pub fn into_result(self) -> Result<Accepted, Rejection> {
        match self {
            ValidationResult::Accepted(a) => Ok(a),
            ValidationResult::Rejected(r) => Err(r),
        }
    }
}

/// Validates proposed transitions under a lifecycle policy
#[derive(Debug, Clone, Default)]
pub struct TransitionValidator {
    policy: LifecyclePolicy,
}

impl TransitionValidator {
    pub fn new(policy: LifecyclePolicy) -> Self {
        Self { policy }
    }

    /// Validator with no edge restrictions and the built-in field rules
    pub fn permissive() -> Self {
        Self::default()
    }

    pub fn policy(&self) -> &LifecyclePolicy {
        &self.policy
    }

    /// Required fields for a target status: the built-in rule plus any
    /// fields the policy adds. Built-in fields cannot be switched off.
    pub fn required_fields(&self, status: LifecycleStatus) -> Vec<ContextField> {
        let mut fields = default_requirements(status).to_vec();
        for field in self.policy.extra_requirements(status) {
            if !fields.contains(field) {
                fields.push(*field);
            }
        }
        fields
    }

    /// Validate a proposed status change
    pub fn validate(
        &self,
        current: LifecycleStatus,
        proposed: LifecycleStatus,
        context: &TransitionContext,
    ) -> ValidationResult {
        // 1. Edge check
        if !self.policy.is_allowed(current, proposed) {
            return ValidationResult::Rejected(Rejection::new(
                RejectionKind::ForbiddenTransition,
                format!(
                    "A prop that is {} cannot be marked {}",
                    current.label(),
                    proposed.label()
                ),
            ));
        }

        // 2. Required fields for the target status
        let normalized = context.normalized();
        let missing: Vec<ContextField> = self
            .required_fields(proposed)
            .into_iter()
            .filter(|field| !normalized.has(*field))
            .collect();

        if missing.is_empty() {
            return ValidationResult::Accepted(Accepted {
                new_status: proposed,
                normalized_context: normalized,
            });
        }

        ValidationResult::Rejected(Self::rejection_for(proposed, missing))
    }

    /// Validate raw status strings, as read from a document or request
    pub fn validate_str(
        &self,
        current: &str,
        proposed: &str,
        context: &TransitionContext,
    ) -> ValidationResult {
        let parsed = current
            .parse::<LifecycleStatus>()
            .and_then(|c| proposed.parse::<LifecycleStatus>().map(|p| (c, p)));

        match parsed {
            Ok((current, proposed)) => self.validate(current, proposed, context),
            Err(e) => ValidationResult::Rejected(Rejection::new(
                RejectionKind::UnknownStatus,
                e.to_string(),
            )),
        }
    }

    fn rejection_for(proposed: LifecycleStatus, missing: Vec<ContextField>) -> Rejection {
        if proposed == LifecycleStatus::CheckedOut && missing.contains(&ContextField::To) {
            return Rejection::missing(
                RejectionKind::MissingCheckoutRecipient,
                "Please enter who the prop is being checked out to",
                missing,
            );
        }

        if proposed.is_damaged()
            && missing
                .iter()
                .any(|f| matches!(f, ContextField::Notes | ContextField::DamagePhoto))
        {
            return Rejection::missing(
                RejectionKind::MissingDamageEvidence,
                format!(
                    "Marking a prop {} requires a description of the damage and at least one photo",
                    proposed.label()
                ),
                missing,
            );
        }

        let wanted: Vec<&str> = missing.iter().map(|f| f.describe()).collect();
        Rejection::missing(
            RejectionKind::MissingField,
            format!("{} requires {}", proposed.label(), wanted.join(" and ")),
            missing,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyLoader;
    use crate::status::StatusCatalog;
    use chrono::NaiveDate;

    fn due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, 20).unwrap()
    }

    fn validate(
        current: LifecycleStatus,
        proposed: LifecycleStatus,
        ctx: TransitionContext,
    ) -> ValidationResult {
        TransitionValidator::permissive().validate(current, proposed, &ctx)
    }

    fn kind(result: &ValidationResult) -> Option<RejectionKind> {
        result.rejection().map(|r| r.kind)
    }

    #[test]
    fn test_checkout_requires_recipient() {
        let result = validate(
            LifecycleStatus::AvailableInStorage,
            LifecycleStatus::CheckedOut,
            TransitionContext::new(),
        );
        assert_eq!(kind(&result), Some(RejectionKind::MissingCheckoutRecipient));

        let blank = validate(
            LifecycleStatus::AvailableInStorage,
            LifecycleStatus::CheckedOut,
            TransitionContext::new().to("   "),
        );
        assert_eq!(kind(&blank), Some(RejectionKind::MissingCheckoutRecipient));
    }

    #[test]
    fn test_checkout_with_recipient_accepted() {
        let result = validate(
            LifecycleStatus::AvailableInStorage,
            LifecycleStatus::CheckedOut,
            TransitionContext::new().to("Jane Doe"),
        );
        let accepted = result.accepted().unwrap();
        assert_eq!(accepted.new_status, LifecycleStatus::CheckedOut);
        assert_eq!(accepted.normalized_context.to.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_damage_requires_notes_and_photo() {
        let only_notes = validate(
            LifecycleStatus::CheckedOut,
            LifecycleStatus::DamagedAwaitingRepair,
            TransitionContext::new().notes("cracked"),
        );
        assert_eq!(kind(&only_notes), Some(RejectionKind::MissingDamageEvidence));
        assert_eq!(
            only_notes.rejection().unwrap().missing_fields,
            vec![ContextField::DamagePhoto]
        );

        let full = validate(
            LifecycleStatus::CheckedOut,
            LifecycleStatus::DamagedAwaitingRepair,
            TransitionContext::new().notes("cracked").damage_photo("uri1"),
        );
        assert!(full.is_accepted());

        let replacement = validate(
            LifecycleStatus::InUseOnSet,
            LifecycleStatus::DamagedAwaitingReplacement,
            TransitionContext::new().damage_photo("uri1"),
        );
        assert_eq!(kind(&replacement), Some(RejectionKind::MissingDamageEvidence));
    }

    #[test]
    fn test_per_status_required_fields() {
        use LifecycleStatus::*;

        let cases = [
            (
                WithProps,
                TransitionContext::new().notes("repaint"),
                vec![ContextField::DueBackDate],
            ),
            (
                WithMaker,
                TransitionContext::new().due_back(due()),
                vec![ContextField::MakerName],
            ),
            (
                OnDelivery,
                TransitionContext::new(),
                vec![ContextField::DeliveryDate, ContextField::DeliveryVenue],
            ),
            (UnderReview, TransitionContext::new(), vec![ContextField::Notes]),
            (Backup, TransitionContext::new(), vec![ContextField::WhoHasBackup]),
            (Cut, TransitionContext::new(), vec![ContextField::Notes]),
        ];

        for (proposed, ctx, expected_missing) in cases {
            let result = validate(AvailableInStorage, proposed, ctx);
            let rejection = result.rejection().unwrap_or_else(|| panic!("{} accepted", proposed));
            assert_eq!(rejection.kind, RejectionKind::MissingField, "{}", proposed);
            assert_eq!(rejection.missing_fields, expected_missing, "{}", proposed);
            assert!(rejection.message.starts_with(proposed.label()));
        }
    }

    #[test]
    fn test_complete_contexts_accepted() {
        use LifecycleStatus::*;

        let cases = [
            (WithProps, TransitionContext::new().notes("repaint").due_back(due())),
            (WithMaker, TransitionContext::new().maker("Bob").due_back(due())),
            (OnDelivery, TransitionContext::new().delivery(due(), "Old Vic")),
            (UnderReview, TransitionContext::new().notes("check period accuracy")),
            (Backup, TransitionContext::new().backup_holder("Stage left")),
            (Cut, TransitionContext::new().notes("scene removed")),
        ];

        for (proposed, ctx) in cases {
            assert!(validate(AvailableInStorage, proposed, ctx).is_accepted(), "{}", proposed);
        }
    }

    #[test]
    fn test_statuses_without_requirements_accept_empty_context() {
        use LifecycleStatus::*;
        for proposed in [
            AvailableInStorage,
            InUseOnSet,
            Missing,
            ReadyForDisposal,
            Confirmed,
            Consumable,
        ] {
            assert!(validate(CheckedOut, proposed, TransitionContext::new()).is_accepted());
        }
    }

    #[test]
    fn test_permissive_allows_any_edge() {
        let result = validate(
            LifecycleStatus::Missing,
            LifecycleStatus::AvailableInStorage,
            TransitionContext::new(),
        );
        assert!(result.is_accepted());

        for &from in StatusCatalog::all_statuses() {
            let result = validate(from, LifecycleStatus::Missing, TransitionContext::new());
            assert!(result.is_accepted());
        }
    }

    #[test]
    fn test_strict_policy_forbids_unlisted_edges() {
        let validator = TransitionValidator::new(LifecyclePolicy::recommended_strict());

        let result = validator.validate(
            LifecycleStatus::InUseOnSet,
            LifecycleStatus::CheckedOut,
            &TransitionContext::new().to("Jane"),
        );
        assert_eq!(kind(&result), Some(RejectionKind::ForbiddenTransition));

        let ok = validator.validate(
            LifecycleStatus::AvailableInStorage,
            LifecycleStatus::CheckedOut,
            &TransitionContext::new().to("Jane"),
        );
        assert!(ok.is_accepted());
    }

    #[test]
    fn test_policy_requirements_add_to_built_in_rules() {
        let yaml = "requirements:\n  in_use_on_set: [notes]\n  cut: []\n  checked_out: [notes]\n";
        let validator = TransitionValidator::new(PolicyLoader::load_from_str(yaml).unwrap());

        let set = validator.validate(
            LifecycleStatus::AvailableInStorage,
            LifecycleStatus::InUseOnSet,
            &TransitionContext::new(),
        );
        assert_eq!(kind(&set), Some(RejectionKind::MissingField));

        let cut = validator.validate(
            LifecycleStatus::AvailableInStorage,
            LifecycleStatus::Cut,
            &TransitionContext::new(),
        );
        assert_eq!(kind(&cut), Some(RejectionKind::MissingField));
        assert_eq!(cut.rejection().unwrap().missing_fields, vec![ContextField::Notes]);

        assert_eq!(
            validator.required_fields(LifecycleStatus::CheckedOut),
            vec![ContextField::To, ContextField::Notes]
        );
        let checkout = validator.validate(
            LifecycleStatus::AvailableInStorage,
            LifecycleStatus::CheckedOut,
            &TransitionContext::new().notes("for the matinee"),
        );
        assert_eq!(kind(&checkout), Some(RejectionKind::MissingCheckoutRecipient));
    }

    #[test]
    fn test_into_result() {
        let accepted = validate(
            LifecycleStatus::CheckedOut,
            LifecycleStatus::AvailableInStorage,
            TransitionContext::new().notes("  returned early  "),
        )
        .into_result()
        .unwrap();
        assert_eq!(accepted.new_status, LifecycleStatus::AvailableInStorage);
        assert_eq!(accepted.normalized_context.notes.as_deref(), Some("returned early"));

        let rejection = validate(
            LifecycleStatus::AvailableInStorage,
            LifecycleStatus::Backup,
            TransitionContext::new(),
        )
        .into_result()
        .unwrap_err();
        assert_eq!(rejection.kind, RejectionKind::MissingField);
        assert_eq!(rejection.missing_fields, vec![ContextField::WhoHasBackup]);
    }

    #[test]
    fn test_unknown_status_strings() {
        let validator = TransitionValidator::permissive();

        let result =
            validator.validate_str("available_in_storage", "borrowed", &TransitionContext::new());
        assert_eq!(kind(&result), Some(RejectionKind::UnknownStatus));

        let result = validator.validate_str("", "missing", &TransitionContext::new());
        assert_eq!(kind(&result), Some(RejectionKind::UnknownStatus));

        let result = validator.validate_str("checked_out", "missing", &TransitionContext::new());
        assert!(result.is_accepted());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::status::StatusCatalog;
    use proptest::prelude::*;

    fn arb_status() -> impl Strategy<Value = LifecycleStatus> {
        prop::sample::select(StatusCatalog::all_statuses().to_vec())
    }

    fn arb_context() -> impl Strategy<Value = TransitionContext> {
        (
            prop::option::of("[ a-zA-Z]{0,12}"),
            prop::option::of("[ a-z]{0,12}"),
            prop::option::of("[a-zA-Z]{0,8}"),
            prop::collection::vec("[a-z0-9:/]{0,6}", 0..3),
        )
            .prop_map(|(to, notes, maker_name, damage_photos)| TransitionContext {
                to,
                notes,
                maker_name,
                damage_photos,
                ..TransitionContext::default()
            })
    }

    proptest! {
        /// Same inputs always give the same outcome.
        #[test]
        fn validate_is_deterministic(
            current in arb_status(),
            proposed in arb_status(),
            ctx in arb_context(),
        ) {
            let validator = TransitionValidator::permissive();
            let first = validator.validate(current, proposed, &ctx);
            let second = validator.validate(current, proposed, &ctx);
            prop_assert_eq!(first, second);
        }

        /// Under the permissive policy the current status never decides the outcome.
        #[test]
        fn permissive_ignores_current_status(
            a in arb_status(),
            b in arb_status(),
            proposed in arb_status(),
            ctx in arb_context(),
        ) {
            let validator = TransitionValidator::permissive();
            prop_assert_eq!(
                validator.validate(a, proposed, &ctx).is_accepted(),
                validator.validate(b, proposed, &ctx).is_accepted()
            );
        }

        /// Accepted transitions target the proposed status.
        #[test]
        fn accepted_targets_proposed(
            current in arb_status(),
            proposed in arb_status(),
            ctx in arb_context(),
        ) {
            if let ValidationResult::Accepted(accepted) =
                TransitionValidator::permissive().validate(current, proposed, &ctx)
            {
                prop_assert_eq!(accepted.new_status, proposed);
            }
        }
    }
}
