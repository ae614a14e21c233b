//! Plan tiers and the static pricing catalog shown on the plans page.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Pro,
    Enterprise,
}

impl PlanTier {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Pro => "pro",
            PlanTier::Enterprise => "enterprise",
        }
    }

    /// Words per month included in the tier. `None` means unlimited.
    pub fn monthly_word_quota(self) -> Option<u64> {
        match self {
            PlanTier::Free => Some(5_000),
            PlanTier::Pro => Some(50_000),
            PlanTier::Enterprise => None,
        }
    }

    pub fn api_access(self) -> bool {
        !matches!(self, PlanTier::Free)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    #[default]
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFeature {
    pub text: &'static str,
    pub included: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: PlanTier,
    pub name: &'static str,
    pub price: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<u32>,
    pub description: &'static str,
    pub features: Vec<PlanFeature>,
    pub popular: bool,
}

const fn feature(text: &'static str, included: bool) -> PlanFeature {
    PlanFeature { text, included }
}

fn free_features() -> Vec<PlanFeature> {
    vec![
        feature("5,000 words per month", true),
        feature("Basic humanization", true),
        feature("Standard support", true),
        feature("File uploads (.txt only)", true),
        feature("API access", false),
        feature("Priority processing", false),
        feature("Advanced humanization", false),
        feature("Custom models", false),
    ]
}

fn pro_features() -> Vec<PlanFeature> {
    vec![
        feature("50,000 words per month", true),
        feature("Advanced humanization", true),
        feature("Priority support", true),
        feature("All file formats (.txt, .docx, .pdf)", true),
        feature("API access (1,000 requests/month)", true),
        feature("Priority processing", true),
        feature("Multiple tone options", true),
        feature("Custom models", false),
    ]
}

fn enterprise_features() -> Vec<PlanFeature> {
    vec![
        feature("Unlimited words", true),
        feature("Custom AI models", true),
        feature("Dedicated support", true),
        feature("All file formats + bulk upload", true),
        feature("Unlimited API access", true),
        feature("Instant processing", true),
        feature("Team management", true),
        feature("SLA guarantee", true),
    ]
}

/// Returns the plan catalog for a billing cycle.
/// Yearly prices charge ten months; `original_price` carries the twelve-month figure.
pub fn catalog(billing: BillingCycle) -> Vec<Plan> {
    let (pro_price, pro_original, ent_price, ent_original) = match billing {
        BillingCycle::Monthly => (19, None, 99, None),
        BillingCycle::Yearly => (190, Some(228), 990, Some(1188)),
    };

    vec![
        Plan {
            id: PlanTier::Free,
            name: "Free",
            price: 0,
            original_price: None,
            description: "Perfect for trying out our service",
            features: free_features(),
            popular: false,
        },
        Plan {
            id: PlanTier::Pro,
            name: "Pro",
            price: pro_price,
            original_price: pro_original,
            description: "Best for content creators and marketers",
            features: pro_features(),
            popular: true,
        },
        Plan {
            id: PlanTier::Enterprise,
            name: "Enterprise",
            price: ent_price,
            original_price: ent_original,
            description: "For teams and large organizations",
            features: enterprise_features(),
            popular: false,
        },
    ]
}
