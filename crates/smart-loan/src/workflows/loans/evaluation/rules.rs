use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::super::domain::LoanType;
use super::LoanDecision;

/// Home loans are approved strictly below this amount.
pub const HOME_APPROVAL_CEILING: f64 = 5_000_000.0;

/// Personal loans are approved up to and including this amount.
pub const PERSONAL_APPROVAL_LIMIT: f64 = 500_000.0;

/// Deterministic amount-threshold rule for one product line.
pub trait RiskRule: Send + Sync {
    fn loan_type(&self) -> LoanType;

    fn evaluate(&self, amount: f64) -> LoanDecision;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HomeRiskRule;

impl RiskRule for HomeRiskRule {
    fn loan_type(&self) -> LoanType {
        LoanType::Home
    }

    fn evaluate(&self, amount: f64) -> LoanDecision {
        if amount < HOME_APPROVAL_CEILING {
            LoanDecision::Approved
        } else {
            LoanDecision::Rejected
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PersonalRiskRule;

impl RiskRule for PersonalRiskRule {
    fn loan_type(&self) -> LoanType {
        LoanType::Personal
    }

    fn evaluate(&self, amount: f64) -> LoanDecision {
        if amount > PERSONAL_APPROVAL_LIMIT {
            LoanDecision::Rejected
        } else {
            LoanDecision::Approved
        }
    }
}

/// Registry mapping each product line to its risk rule.
#[derive(Clone, Default)]
pub struct RiskRuleBook {
    rules: BTreeMap<LoanType, Arc<dyn RiskRule>>,
}

impl RiskRuleBook {
    /// Rule book covering every shipped product line.
    pub fn standard() -> Self {
        Self::default()
            .with_rule(Arc::new(HomeRiskRule))
            .with_rule(Arc::new(PersonalRiskRule))
    }

    /// Register `rule` for the product it reports, replacing any previous entry.
    pub fn with_rule(mut self, rule: Arc<dyn RiskRule>) -> Self {
        self.rules.insert(rule.loan_type(), rule);
        self
    }

    pub fn rule_for(&self, loan_type: LoanType) -> Option<&dyn RiskRule> {
        self.rules.get(&loan_type).map(|rule| rule.as_ref())
    }

    pub fn covers(&self, loan_type: LoanType) -> bool {
        self.rules.contains_key(&loan_type)
    }
}

impl fmt::Debug for RiskRuleBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RiskRuleBook")
            .field("loan_types", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}
