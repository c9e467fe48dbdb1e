use std::rc::Rc;

use gloo::timers::callback::{Interval, Timeout};
use gloo::timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{
    booster_button::BoosterButton, score_panel::ScorePanel, tap_section::TapSection,
    toast::ToastStack, wallet_info::WalletInfo,
};
use crate::bridge::{CloudScoreBackend, Notification, TonConnectSession, telegram};
use crate::config::GameConfig;
use crate::model::{GameAction, GameState, ToastAction, ToastVariant, Toasts};
use crate::payment::{PaymentGateway, TransactionRequest, confirm_with_timeout};
use crate::state::{ActivationRejected, AttemptId, TimerSlots, floating, score};
use crate::storage::{LocalScoreBackend, ScoreBackend, ScoreStore, browser_local_storage};
use crate::util::{clog, cwarn, format_duration, now_ms, remaining_secs, timer_delay};

fn build_store() -> ScoreStore {
    let mut backends: Vec<Rc<dyn ScoreBackend>> = Vec::new();
    if let Some(cloud) = CloudScoreBackend::detect() {
        backends.push(Rc::new(cloud));
    }
    if let Some(local) = browser_local_storage() {
        backends.push(Rc::new(LocalScoreBackend::new(local)));
    }
    let store = ScoreStore::new(backends);
    clog(&format!("score backends: {:?}", store.backend_names()));
    store
}

/// Toast shown when an activation attempt is turned away.
pub fn rejection_notice(rejected: ActivationRejected) -> (String, String, ToastVariant) {
    match rejected {
        ActivationRejected::NoWallet => (
            "Connect Wallet".to_string(),
            "Please connect your TON wallet to activate the booster.".to_string(),
            ToastVariant::Destructive,
        ),
        ActivationRejected::Pending => (
            "Transaction pending".to_string(),
            "Confirm the booster payment in your wallet.".to_string(),
            ToastVariant::Default,
        ),
        ActivationRejected::AlreadyActive { remaining_ms } => (
            "Booster active".to_string(),
            format!("Already boosted for another {}s.", remaining_secs(remaining_ms, 0)),
            ToastVariant::Default,
        ),
        ActivationRejected::CoolingDown { remaining_ms } => (
            "Booster cooling down".to_string(),
            format!("Available again in {}s.", remaining_secs(remaining_ms, 0)),
            ToastVariant::Default,
        ),
    }
}

fn show(toasts: &UseReducerDispatcher<Toasts>, title: String, description: String, variant: ToastVariant) {
    toasts.dispatch(ToastAction::Show {
        title,
        description,
        variant,
    });
}

/// Pointer position relative to the tap target's positioned container.
fn tap_point(e: &MouseEvent) -> (f64, f64) {
    let area = e
        .current_target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .map(|el| el.parent_element().unwrap_or(el));
    match area {
        Some(el) => {
            let rect = el.get_bounding_client_rect();
            (
                e.client_x() as f64 - rect.left(),
                e.client_y() as f64 - rect.top(),
            )
        }
        None => (e.offset_x() as f64, e.offset_y() as f64),
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| GameConfig::load_from_document());
    let game = {
        let config = config.clone();
        use_reducer(move || GameState::new(config))
    };
    let toasts = use_reducer(Toasts::default);
    let store = use_memo((), |_| build_store());
    let wallet = use_mut_ref(|| None::<Rc<TonConnectSession>>);
    let wallet_available = use_state(|| true);
    let booster_timers = use_mut_ref(TimerSlots::<Timeout>::default);
    let next_attempt = use_mut_ref(|| 0 as AttemptId);
    let payment_in_flight = use_mut_ref(|| false);
    let tap_area = use_node_ref();

    // Host handshake, wallet subscription and the one-second clock
    {
        let dispatcher = game.dispatcher();
        let wallet = wallet.clone();
        let wallet_available = wallet_available.clone();
        let config = config.clone();
        let booster_timers = booster_timers.clone();
        use_effect_with((), move |_| {
            telegram::ready();
            let on_change = {
                let dispatcher = dispatcher.clone();
                move |address: Option<String>| dispatcher.dispatch(GameAction::WalletChanged(address))
            };
            let session = TonConnectSession::connect(&config.manifest_url, on_change);
            wallet_available.set(session.is_some());
            *wallet.borrow_mut() = session.map(Rc::new);
            let tick = Interval::new(1_000, move || {
                dispatcher.dispatch(GameAction::Tick { now: now_ms() })
            });
            move || {
                drop(tick);
                booster_timers.borrow_mut().cancel_all();
                wallet.borrow_mut().take();
            }
        });
    }

    // Load the stored score whenever the connected address changes
    {
        let dispatcher = game.dispatcher();
        let store = store.clone();
        use_effect_with(game.score.address.clone(), move |address| {
            if let Some(address) = address.clone() {
                spawn_local(async move {
                    let value = score::load((*store).clone(), address.clone()).await;
                    clog(&format!("loaded score {} for {}", value, address));
                    dispatcher.dispatch(GameAction::ScoreLoaded {
                        address,
                        score: value,
                    });
                });
            }
            || ()
        });
    }

    // Persist every score change once the stored value is known
    {
        let store = store.clone();
        use_effect_with(game.score.persist_target(), move |target| {
            if let Some((address, value)) = target {
                spawn_local(score::save(&store, address, *value));
            }
            || ()
        });
    }

    let on_tap = {
        let dispatcher = game.dispatcher();
        Callback::from(move |e: MouseEvent| {
            let (x, y) = tap_point(&e);
            let (x, y) = floating::jittered(x, y, js_sys::Math::random(), js_sys::Math::random());
            dispatcher.dispatch(GameAction::Tap { now: now_ms(), x, y });
            telegram::impact_medium();
        })
    };

    let on_text_done = {
        let dispatcher = game.dispatcher();
        Callback::from(move |id: u64| dispatcher.dispatch(GameAction::FloatingExpired { id }))
    };

    let on_toast_dismiss = {
        let dispatcher = toasts.dispatcher();
        Callback::from(move |id: u64| dispatcher.dispatch(ToastAction::Dismiss(id)))
    };

    let on_activate = {
        let game = game.clone();
        let toasts = toasts.dispatcher();
        let wallet = wallet.clone();
        let config = config.clone();
        let booster_timers = booster_timers.clone();
        let next_attempt = next_attempt.clone();
        let payment_in_flight = payment_in_flight.clone();
        let tap_area = tap_area.clone();
        Callback::from(move |_: ()| {
            let now = now_ms();
            let session = wallet.borrow().clone();
            let check = if *payment_in_flight.borrow() {
                Err(ActivationRejected::Pending)
            } else {
                game.booster
                    .check_activation(now, game.wallet_connected() && session.is_some())
            };
            let session = match (check, session) {
                (Ok(()), Some(session)) => session,
                (Err(rejected), _) => {
                    if rejected == ActivationRejected::NoWallet {
                        telegram::notify(Notification::Warning);
                    }
                    let (title, description, variant) = rejection_notice(rejected);
                    show(&toasts, title, description, variant);
                    return;
                }
                (Ok(()), None) => return,
            };

            let attempt = {
                let mut n = next_attempt.borrow_mut();
                *n += 1;
                *n
            };
            *payment_in_flight.borrow_mut() = true;
            game.dispatch(GameAction::BoosterRequested { attempt, now });

            let request = TransactionRequest::booster(&config.payment, now);
            let payment = session.send_transaction(&request);
            let timeout = TimeoutFuture::new(timer_delay(config.payment_timeout_ms));
            let dispatcher = game.dispatcher();
            let toasts = toasts.clone();
            let config = config.clone();
            let booster_timers = booster_timers.clone();
            let payment_in_flight = payment_in_flight.clone();
            let bonus_at = tap_area
                .cast::<web_sys::Element>()
                .map(|el| (el.client_width() as f64 / 2.0 - 50.0, 0.0))
                .unwrap_or((100.0, 0.0));
            spawn_local(async move {
                let outcome = confirm_with_timeout(payment, timeout).await;
                *payment_in_flight.borrow_mut() = false;
                match outcome {
                    Ok(()) => {
                        let now = now_ms();
                        dispatcher.dispatch(GameAction::BoosterConfirmed {
                            attempt,
                            now,
                            x: bonus_at.0,
                            y: bonus_at.1,
                        });
                        let expire = {
                            let dispatcher = dispatcher.clone();
                            let toasts = toasts.clone();
                            let multiplier = config.multiplier;
                            Timeout::new(timer_delay(config.active_duration_ms), move || {
                                dispatcher.dispatch(GameAction::BoosterExpired {
                                    attempt,
                                    now: now_ms(),
                                });
                                show(
                                    &toasts,
                                    "Booster Expired".to_string(),
                                    format!("Your {}x points boost has ended.", multiplier),
                                    ToastVariant::Default,
                                );
                            })
                        };
                        let cooldown = {
                            let dispatcher = dispatcher.clone();
                            let total = config
                                .active_duration_ms
                                .saturating_add(config.cooldown_duration_ms);
                            Timeout::new(timer_delay(total), move || {
                                dispatcher.dispatch(GameAction::CooldownFinished {
                                    attempt,
                                    now: now_ms(),
                                });
                            })
                        };
                        booster_timers
                            .borrow_mut()
                            .schedule(attempt, vec![expire, cooldown]);
                        show(
                            &toasts,
                            "Booster Activated!".to_string(),
                            format!(
                                "+{} bonus! Transaction sent. You now earn {}x points for {}.",
                                config.activation_bonus,
                                config.multiplier,
                                format_duration(config.active_duration_ms)
                            ),
                            ToastVariant::Default,
                        );
                        telegram::notify(Notification::Success);
                    }
                    Err(e) => {
                        cwarn(&format!("booster attempt {} failed: {}", attempt, e));
                        booster_timers.borrow_mut().cancel(attempt);
                        dispatcher.dispatch(GameAction::BoosterFailed { attempt });
                        show(
                            &toasts,
                            "Transaction Failed".to_string(),
                            e.user_message(),
                            ToastVariant::Destructive,
                        );
                        telegram::notify(Notification::Error);
                    }
                }
            });
        })
    };

    let now = game.now;
    let booster_view = game.booster.view(now);
    html! {
        <div style="min-height:100vh; width:100%; box-sizing:border-box; padding:16px; display:flex; flex-direction:column; align-items:center; gap:24px; background:#0e1116; color:#e6edf3; font-family:system-ui, sans-serif;">
            <header style="width:100%; max-width:448px;">
                <h1 style="margin:0; font-size:36px; font-weight:700; text-align:center; color:#58a6ff;">{"TapTon Rewards"}</h1>
            </header>
            <WalletInfo address={game.score.address.clone()} available={*wallet_available} />
            <ScorePanel score={game.score.value} synced={game.score.address.is_none() || game.score.loaded} />
            <TapSection
                on_tap={on_tap}
                boosted={game.booster.is_active(now_ms())}
                multiplier={config.multiplier}
                texts={game.floating.items.clone()}
                text_ttl_ms={config.floating_text_ms}
                on_text_done={on_text_done}
                area_ref={tap_area.clone()}
            />
            <BoosterButton
                view={booster_view}
                now={now}
                multiplier={config.multiplier}
                active_ms={config.active_duration_ms}
                on_activate={on_activate}
            />
            <footer style="margin-top:auto; padding-top:16px; font-size:12px; opacity:0.6;">{"Powered by TON Blockchain"}</footer>
            <ToastStack toasts={toasts.items.clone()} ttl_ms={config.toast_ms} on_dismiss={on_toast_dismiss} />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_rejection_has_its_own_notice() {
        let (title, _, variant) = rejection_notice(ActivationRejected::NoWallet);
        assert_eq!(title, "Connect Wallet");
        assert_eq!(variant, ToastVariant::Destructive);
        let (_, text, _) = rejection_notice(ActivationRejected::CoolingDown {
            remaining_ms: 55_000,
        });
        assert_eq!(text, "Available again in 55s.");
        let (title, _, _) = rejection_notice(ActivationRejected::Pending);
        assert_eq!(title, "Transaction pending");
    }
}
