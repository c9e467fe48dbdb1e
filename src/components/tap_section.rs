use yew::prelude::*;

use super::floating_texts::FloatingLayer;
use crate::state::FloatingText;

#[derive(Properties, PartialEq, Clone)]
pub struct TapSectionProps {
    pub on_tap: Callback<MouseEvent>,
    pub boosted: bool,
    pub multiplier: u64,
    pub texts: Vec<FloatingText>,
    pub text_ttl_ms: u64,
    pub on_text_done: Callback<u64>,
    /// Positioned box the floating labels are placed in.
    pub area_ref: NodeRef,
}

#[function_component(TapSection)]
pub fn tap_section(props: &TapSectionProps) -> Html {
    let ring = if props.boosted {
        "box-shadow:0 0 0 6px rgba(210,153,34,0.55), 0 10px 30px rgba(0,0,0,0.6);"
    } else {
        "box-shadow:0 10px 30px rgba(0,0,0,0.6);"
    };
    let button_style = format!(
        "width:208px; height:208px; border-radius:50%; border:2px solid #1f6feb; background:radial-gradient(circle at 35% 30%, #388bfd, #1f6feb 60%, #0d419d); color:#fff; cursor:pointer; display:flex; flex-direction:column; align-items:center; justify-content:center; gap:8px; user-select:none; touch-action:manipulation; {}",
        ring
    );
    html! {
        <div style="display:flex; flex-direction:column; align-items:center; gap:14px; width:100%;">
            <div ref={props.area_ref.clone()} style="position:relative; width:100%; max-width:448px; display:flex; justify-content:center;">
                <button class="tap-target" onclick={props.on_tap.clone()} style={button_style} aria-label="Tap to earn">
                    <span style="font-size:72px; line-height:1; pointer-events:none;">{"🪙"}</span>
                    <span style="font-size:24px; font-weight:700; letter-spacing:1px; pointer-events:none;">{"✋ TAP!"}</span>
                </button>
                <FloatingLayer texts={props.texts.clone()} ttl_ms={props.text_ttl_ms} on_done={props.on_text_done.clone()} />
            </div>
            if props.boosted {
                <p class="pulse" style="margin:0; color:#d29922; font-weight:600;">{ format!("{}X POINTS ACTIVE!", props.multiplier) }</p>
            }
        </div>
    }
}
