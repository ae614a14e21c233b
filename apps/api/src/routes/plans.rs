use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::plan::{catalog, BillingCycle, Plan, PlanTier};
use crate::models::toast::NewToast;
use crate::models::user::User;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct BillingQuery {
    #[serde(default)]
    pub billing: BillingCycle,
}

/// GET /api/v1/plans?billing=monthly|yearly
pub async fn handle_list_plans(Query(params): Query<BillingQuery>) -> Json<Vec<Plan>> {
    Json(catalog(params.billing))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSelection {
    pub plan: PlanTier,
    /// The signed-in user with the new plan applied, when there is one.
    pub user: Option<User>,
}

/// POST /api/v1/plans/:tier/select
/// Enterprise is sales-assisted: the user's plan is left unchanged.
pub async fn handle_select_plan(
    State(state): State<AppState>,
    Path(tier): Path<PlanTier>,
) -> Result<Json<PlanSelection>, AppError> {
    let mut user = state.session.current_user()?;

    if tier == PlanTier::Enterprise {
        state.toasts.publish(
            NewToast::info("Contact sales")
                .with_message("Our team will reach out to discuss enterprise options"),
        );
        return Ok(Json(PlanSelection { plan: tier, user }));
    }

    if let Some(user) = user.as_mut() {
        user.plan = tier;
        state.session.set_current_user(user)?;
    }

    let toast = match tier {
        PlanTier::Free => NewToast::success("Free plan selected")
            .with_message("You can start using the service right away!"),
        _ => NewToast::success("Plan selected")
            .with_message(format!("Starting your {} plan trial...", tier.as_str())),
    };
    state.toasts.publish(toast);

    Ok(Json(PlanSelection { plan: tier, user }))
}
