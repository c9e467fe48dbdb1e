mod bridge;
mod components;
mod config;
mod model;
mod payment;
mod state;
mod storage;
mod util;

fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<components::app::App>::new().render();
}
