use shared::{Toast, ToastKind};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ToastViewProps {
    pub toast: Option<Toast>,
    pub on_dismiss: Callback<()>,
}

#[function_component(ToastView)]
pub fn toast_view(props: &ToastViewProps) -> Html {
    let Some(toast) = props.toast.as_ref() else {
        return html! {};
    };

    let kind = match toast.kind {
        ToastKind::Success => "success",
        ToastKind::Error => "error",
    };
    let on_close = {
        let on_dismiss = props.on_dismiss.clone();
        Callback::from(move |_: MouseEvent| on_dismiss.emit(()))
    };

    html! {
        <div class={classes!("toast", kind)} role="status">
            <div class="toast-body">
                <strong class="toast-title">{&toast.title}</strong>
                <div class="toast-message">{&toast.message}</div>
            </div>
            <button class="toast-close" onclick={on_close} title="Dismiss">{"×"}</button>
        </div>
    }
}
