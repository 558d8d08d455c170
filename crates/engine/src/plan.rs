// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plan-mode rendering: a text summary of what `apply` would do, without
//! doing it. Terminal coloring is left to the CLI; this just groups and
//! formats the two rule lists (§4.6 step 5).

use bp_handlers::{AnyHandler, Handler};

use crate::reconciler::Plan;

/// One line per rule in the plan's display, in execution order.
pub fn render(plan: &Plan) -> String {
    let mut out = String::new();

    out.push_str(&format!("{} rule(s) to apply:\n", plan.desired.len()));
    for rule in &plan.desired {
        out.push_str("  + ");
        out.push_str(&AnyHandler::for_rule(rule).display_summary());
        out.push('\n');
    }

    if !plan.auto_uninstalls.is_empty() {
        out.push_str(&format!("\n{} auto-uninstall(s) from drift:\n", plan.auto_uninstalls.len()));
        for rule in &plan.auto_uninstalls {
            out.push_str("  - ");
            out.push_str(&AnyHandler::for_rule(rule).display_summary());
            out.push('\n');
        }
    }

    if plan.cleaned_clones > 0 || plan.cleaned_decrypts > 0 {
        out.push_str(&format!(
            "\nalready cleaned up: {} clone(s), {} decrypted file(s)\n",
            plan.cleaned_clones, plan.cleaned_decrypts
        ));
    }

    out.push_str("\nno changes will be applied\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_core::{Action, InstallPayload, Package, Rule};

    #[test]
    fn render_lists_desired_and_auto_uninstalls() {
        let plan = Plan {
            desired: vec![Rule::new(Action::Install(InstallPayload {
                packages: vec![Package::new("curl")],
            }))],
            auto_uninstalls: vec![Rule::new(Action::Uninstall(bp_core::UninstallPayload::Packages(
                vec![Package::new("vim")],
            )))],
            cleaned_clones: 1,
            cleaned_decrypts: 0,
        };
        let text = render(&plan);
        assert!(text.contains("1 rule(s) to apply"));
        assert!(text.contains("1 auto-uninstall(s)"));
        assert!(text.contains("already cleaned up: 1 clone(s), 0 decrypted file(s)"));
        assert!(text.contains("no changes will be applied"));
    }

    #[test]
    fn empty_plan_still_prints_footer() {
        let plan = Plan::default();
        let text = render(&plan);
        assert!(text.contains("0 rule(s) to apply"));
        assert!(text.contains("no changes will be applied"));
    }
}
