use serde_json::json;

use aios_domain::LinkStatus;

use crate::{CommandContext, ExecutionOutcome};

pub fn workspace_validate(ctx: &CommandContext) -> ExecutionOutcome {
    let validation = match ctx.reconciler().validate() {
        Ok(validation) => validation,
        Err(err) => return ExecutionOutcome::from_error(&err),
    };
    let message = if validation.healthy {
        "all links healthy".to_string()
    } else {
        let unhealthy = validation.reports.len() - validation.count(LinkStatus::Ok);
        format!("{unhealthy} link(s) need attention")
    };
    let counts = json!({
        "ok": validation.count(LinkStatus::Ok),
        "missing": validation.count(LinkStatus::Missing),
        "broken": validation.count(LinkStatus::Broken),
        "conflict": validation.count(LinkStatus::Conflict),
    });
    ExecutionOutcome::success(
        message,
        json!({
            "healthy": validation.healthy,
            "counts": counts,
            "reports": validation.reports,
        }),
    )
}

pub fn workspace_plan(ctx: &CommandContext) -> ExecutionOutcome {
    match ctx.reconciler().plan() {
        Ok(plan) => {
            let pending = plan
                .actions
                .iter()
                .filter(|action| action.kind.is_mutation())
                .count();
            ExecutionOutcome::success(
                format!("{pending} action(s) pending"),
                json!({ "healthy": plan.healthy, "actions": plan.actions }),
            )
        }
        Err(err) => ExecutionOutcome::from_error(&err),
    }
}

pub fn workspace_repair(ctx: &CommandContext) -> ExecutionOutcome {
    let result = match ctx.reconciler().repair() {
        Ok(result) => result,
        Err(err) => return ExecutionOutcome::from_error(&err),
    };
    let failed = result.failed().count();
    let mut details = json!({
        "healthy": result.healthy,
        "applied": result.applied,
        "skipped": result.skipped,
    });
    if failed > 0 {
        details["reason"] = json!("repair_incomplete");
        details["hint"] = json!("Inspect the skipped actions; conflicting paths are never replaced.");
        return ExecutionOutcome::failure(
            format!("{failed} link(s) could not be repaired"),
            details,
        );
    }
    ExecutionOutcome::success(
        format!(
            "applied {} action(s), skipped {}",
            result.applied.len(),
            result.skipped.len()
        ),
        details,
    )
}
