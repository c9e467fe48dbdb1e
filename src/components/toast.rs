use gloo::timers::callback::Timeout;
use yew::prelude::*;

use crate::model::{Toast, ToastVariant};
use crate::util::timer_delay;

#[derive(Properties, PartialEq, Clone)]
pub struct ToastItemProps {
    pub toast: Toast,
    pub ttl_ms: u64,
    pub on_dismiss: Callback<u64>,
}

#[function_component(ToastItem)]
pub fn toast_item(props: &ToastItemProps) -> Html {
    {
        let id = props.toast.id;
        let ttl = timer_delay(props.ttl_ms);
        let on_dismiss = props.on_dismiss.clone();
        use_effect_with(id, move |_| {
            let timeout = Timeout::new(ttl, move || on_dismiss.emit(id));
            move || drop(timeout)
        });
    }
    let close = {
        let id = props.toast.id;
        let cb = props.on_dismiss.clone();
        Callback::from(move |_| cb.emit(id))
    };
    let border = match props.toast.variant {
        ToastVariant::Default => "#30363d",
        ToastVariant::Destructive => "#f85149",
    };
    let style = format!(
        "background:#161b22; border:1px solid {}; border-radius:10px; padding:10px 14px; display:flex; gap:10px; align-items:flex-start; box-shadow:0 6px 18px rgba(0,0,0,0.6);",
        border
    );
    html! {
        <div {style} role="status">
            <div style="flex:1; display:flex; flex-direction:column; gap:4px;">
                <strong style="font-size:14px;">{ props.toast.title.clone() }</strong>
                <span style="font-size:13px; opacity:0.85;">{ props.toast.description.clone() }</span>
            </div>
            <button onclick={close} style="background:none; border:none; color:#8b949e; cursor:pointer; font-size:14px;">{"✕"}</button>
        </div>
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct ToastStackProps {
    pub toasts: Vec<Toast>,
    pub ttl_ms: u64,
    pub on_dismiss: Callback<u64>,
}

#[function_component(ToastStack)]
pub fn toast_stack(props: &ToastStackProps) -> Html {
    html! {
        <div style="position:fixed; bottom:16px; left:50%; transform:translateX(-50%); width:92%; max-width:420px; display:flex; flex-direction:column; gap:8px; z-index:50;">
            { for props.toasts.iter().map(|t| html! {
                <ToastItem key={t.id} toast={t.clone()} ttl_ms={props.ttl_ms} on_dismiss={props.on_dismiss.clone()} />
            }) }
        </div>
    }
}
