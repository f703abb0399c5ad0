use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::hooks::use_chat::use_chat;
use crate::hooks::FetchState;

#[derive(Properties, PartialEq)]
pub struct ChatPanelProps {
    pub other_user_id: i64,
    #[prop_or_default]
    pub other_name: Option<String>,
}

#[function_component(ChatPanel)]
pub fn chat_panel(props: &ChatPanelProps) -> Html {
    let chat = use_chat(props.other_user_id);
    let draft = use_state(String::new);

    let Some(me) = chat.state.me.clone() else {
        return html! {
            <section class="chat-panel">
                <div class="chat-empty">{"Sign in to chat with your teacher."}</div>
            </section>
        };
    };

    let on_input = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            draft.set(input.value());
        })
    };

    let on_submit = {
        let draft = draft.clone();
        let send = chat.actions.send.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if draft.trim().is_empty() {
                return;
            }
            send.emit((*draft).clone());
            draft.set(String::new());
        })
    };

    let title = props
        .other_name
        .clone()
        .unwrap_or_else(|| "Conversation".to_string());

    html! {
        <section class="chat-panel">
            <div class="chat-header">
                <h3>{title}</h3>
                {if !chat.state.live {
                    html! { <span class="chat-offline" title="Live updates unavailable">{"offline"}</span> }
                } else { html! {} }}
            </div>

            <div class="chat-messages">
                {match &chat.state.messages {
                    FetchState::Loading => html! { <div class="loading">{"Loading messages..."}</div> },
                    FetchState::Failed(error) => html! { <div class="form-message error">{error}</div> },
                    FetchState::Loaded(messages) if messages.is_empty() => html! {
                        <div class="chat-empty">{"No messages yet."}</div>
                    },
                    FetchState::Loaded(messages) => html! {
                        <>{for messages.iter().map(|message| {
                            let side = if message.sender_id == me.id { "mine" } else { "theirs" };
                            html! {
                                <div key={message.id.to_string()} class={classes!("chat-message", side)}>
                                    <div class="chat-body">{&message.body}</div>
                                    <div class="chat-time">{&message.created_at}</div>
                                </div>
                            }
                        })}</>
                    },
                }}
            </div>

            {if let Some(error) = chat.state.error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            <form class="chat-form" onsubmit={on_submit}>
                <input
                    type="text"
                    placeholder="Write a message..."
                    value={(*draft).clone()}
                    oninput={on_input}
                    disabled={chat.state.sending}
                />
                <button type="submit" class="btn btn-primary" disabled={chat.state.sending}>
                    {if chat.state.sending { "Sending..." } else { "Send" }}
                </button>
            </form>
        </section>
    }
}
