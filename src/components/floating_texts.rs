use gloo::timers::callback::Timeout;
use yew::prelude::*;

use crate::state::FloatingText;
use crate::util::timer_delay;

#[derive(Properties, PartialEq, Clone)]
pub struct FloatingLabelProps {
    pub text: FloatingText,
    pub ttl_ms: u64,
    pub on_done: Callback<u64>,
}

/// One "+N" label; removes itself once its animation has run.
#[function_component(FloatingLabel)]
pub fn floating_label(props: &FloatingLabelProps) -> Html {
    {
        let id = props.text.id;
        let ttl = timer_delay(props.ttl_ms);
        let on_done = props.on_done.clone();
        use_effect_with(id, move |_| {
            let timeout = Timeout::new(ttl, move || on_done.emit(id));
            move || drop(timeout)
        });
    }
    let t = &props.text;
    let style = format!(
        "position:absolute; left:{:.0}px; top:{:.0}px; font-size:24px; font-weight:700; color:#58a6ff; pointer-events:none; white-space:nowrap; animation:floatUpFadeOut {}ms ease-out forwards;",
        t.x, t.y, props.ttl_ms
    );
    html! { <div {style}>{ t.text.clone() }</div> }
}

#[derive(Properties, PartialEq, Clone)]
pub struct FloatingLayerProps {
    pub texts: Vec<FloatingText>,
    pub ttl_ms: u64,
    pub on_done: Callback<u64>,
}

#[function_component(FloatingLayer)]
pub fn floating_layer(props: &FloatingLayerProps) -> Html {
    html! {
        <div style="position:absolute; inset:0; pointer-events:none; overflow:visible;">
            { for props.texts.iter().map(|t| html! {
                <FloatingLabel key={t.id} text={t.clone()} ttl_ms={props.ttl_ms} on_done={props.on_done.clone()} />
            }) }
        </div>
    }
}
