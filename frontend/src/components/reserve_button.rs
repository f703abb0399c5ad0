use brain_bridge_core::ReserveButtonState;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ReserveButtonProps {
    pub state: ReserveButtonState,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(ReserveButton)]
pub fn reserve_button(props: &ReserveButtonProps) -> Html {
    html! {
        <button
            type="button"
            class={classes!("btn", "btn-primary", "reserve-btn", props.state.disabled.then_some("disabled"))}
            disabled={props.state.disabled}
            onclick={props.onclick.clone()}
        >
            {props.state.label}
        </button>
    }
}
