use yew::prelude::*;

use crate::state::BoosterView;
use crate::util::{format_duration, remaining_secs};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoosterLabel {
    pub text: String,
    pub disabled: bool,
    pub busy: bool,
}

pub fn booster_label(view: &BoosterView, now: u64, multiplier: u64, active_ms: u64) -> BoosterLabel {
    if view.pending {
        return BoosterLabel {
            text: "Processing Transaction...".to_string(),
            disabled: true,
            busy: true,
        };
    }
    if let Some(end) = view.end_time.filter(|_| view.active) {
        return BoosterLabel {
            text: format!("Boost Active! ({}s left)", remaining_secs(end, now)),
            disabled: true,
            busy: false,
        };
    }
    if let Some(end) = view.cooldown_end_time.filter(|end| *end > now) {
        return BoosterLabel {
            text: format!("Cooldown ({}s)", remaining_secs(end, now)),
            disabled: true,
            busy: false,
        };
    }
    BoosterLabel {
        text: format!("Activate {}x Boost ({})", multiplier, format_duration(active_ms)),
        disabled: false,
        busy: false,
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct BoosterButtonProps {
    pub view: BoosterView,
    pub now: u64,
    pub multiplier: u64,
    pub active_ms: u64,
    pub on_activate: Callback<()>,
}

#[function_component(BoosterButton)]
pub fn booster_button(props: &BoosterButtonProps) -> Html {
    let label = booster_label(&props.view, props.now, props.multiplier, props.active_ms);
    let onclick = {
        let cb = props.on_activate.clone();
        let disabled = label.disabled;
        Callback::from(move |_| {
            if !disabled {
                cb.emit(())
            }
        })
    };
    let icon = if label.busy { "⏳" } else { "⚡" };
    let style = if label.disabled {
        "width:100%; max-width:448px; padding:12px 16px; font-size:16px; font-weight:600; border-radius:10px; border:1px solid #30363d; background:#21262d; color:#8b949e; cursor:not-allowed;"
    } else {
        "width:100%; max-width:448px; padding:12px 16px; font-size:16px; font-weight:600; border-radius:10px; border:1px solid #d29922; background:#d29922; color:#0d1117; cursor:pointer; box-shadow:0 4px 12px rgba(0,0,0,0.4);"
    };
    html! {
        <button {onclick} disabled={label.disabled} {style}>
            <span class={classes!(label.busy.then_some("spin"))} style="display:inline-block; margin-right:8px;">{ icon }</span>
            { label.text }
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::state::Booster;

    fn idle() -> BoosterView {
        BoosterView {
            active: false,
            pending: false,
            end_time: None,
            cooldown_end_time: None,
        }
    }

    #[test]
    fn idle_offers_activation() {
        let l = booster_label(&idle(), 0, 100, 60_000);
        assert_eq!(l.text, "Activate 100x Boost (1 min)");
        assert!(!l.disabled);
    }

    #[test]
    fn pending_wins_over_everything() {
        let v = BoosterView {
            pending: true,
            ..idle()
        };
        let l = booster_label(&v, 0, 2, 60_000);
        assert!(l.disabled && l.busy);
    }

    #[test]
    fn countdowns() {
        let cfg = GameConfig::default();
        let mut b = Booster::default();
        b.begin(1, 0).unwrap();
        b.confirm(1, 0, &cfg);
        let label_at = |now: u64| booster_label(&b.view(now), now, 2, 60_000);
        assert_eq!(label_at(10_000).text, "Boost Active! (50s left)");
        // expiry timer not yet run: still shows the cooldown
        assert_eq!(label_at(65_000).text, "Cooldown (55s)");
        assert!(!label_at(120_000).disabled);
    }
}
