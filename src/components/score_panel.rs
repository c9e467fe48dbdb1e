use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ScorePanelProps {
    pub score: u64,
    /// False while the stored score for the wallet is still being read.
    pub synced: bool,
}

#[function_component]
pub fn ScorePanel(props: &ScorePanelProps) -> Html {
    let value_style = if props.synced {
        "margin:0; font-size:48px; font-weight:700; text-align:center; color:#58a6ff; font-variant-numeric:tabular-nums;"
    } else {
        "margin:0; font-size:48px; font-weight:700; text-align:center; color:#58a6ff; font-variant-numeric:tabular-nums; opacity:0.5;"
    };
    html! {
        <div style="width:100%; max-width:448px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:12px; padding:14px 18px; box-sizing:border-box;">
            <div style="display:flex; justify-content:space-between; align-items:center; margin-bottom:6px;">
                <span style="font-size:16px; font-weight:600;">{"Your Score"}</span>
                <span style="font-size:20px; color:#d4af37;">{"🪙"}</span>
            </div>
            <p style={value_style}>{ props.score }</p>
        </div>
    }
}
