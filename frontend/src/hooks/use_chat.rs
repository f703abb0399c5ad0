use brain_bridge_core::{ApiError, ChatError, Conversation, FetchScope};
use log::warn;
use shared::{ChatMessage, User};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::FetchState;
use crate::context::use_client;

#[derive(Clone, PartialEq)]
pub struct ChatState {
    pub me: Option<User>,
    pub messages: FetchState<Vec<ChatMessage>>,
    /// Whether real-time updates are flowing for this conversation
    pub live: bool,
    pub sending: bool,
    pub error: Option<String>,
}

pub struct UseChatResult {
    pub state: ChatState,
    pub actions: UseChatActions,
}

#[derive(Clone)]
pub struct UseChatActions {
    pub send: Callback<String>,
}

/// Refetch trigger: a new signed-in user reopens the conversation at
/// generation zero, so the user id has to be part of the key.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FeedKey {
    me_id: Option<i64>,
    other_user_id: i64,
    generation: Option<u64>,
}

/// Conversation between the signed-in user and `other_user_id`.
///
/// Real-time events and our own sends only bump the conversation's feed
/// generation; the message list is then refetched from the API.
#[hook]
pub fn use_chat(other_user_id: i64) -> UseChatResult {
    let client = use_client();
    let me = client.account.current_user();
    let me_id = me.as_ref().map(|user| user.id);

    let conversation = use_mut_ref(|| Option::<Conversation>::None);
    let rerender = use_force_update();
    let messages = use_state(|| FetchState::<Vec<ChatMessage>>::Loading);
    let sending = use_state(|| false);
    let error = use_state(|| Option::<String>::None);

    // Subscribe while mounted
    {
        let chat = client.chat.clone();
        let conversation = conversation.clone();
        let rerender = rerender.clone();
        let messages = messages.clone();

        use_effect_with((me_id, other_user_id), move |&(me_id, other)| {
            let opened = me_id.map(|me| {
                let rerender = rerender.clone();
                chat.open(me, other, move || rerender.force_update())
            });
            *conversation.borrow_mut() = opened.clone();
            messages.set(FetchState::Loading);
            rerender.force_update();

            move || {
                if let Some(opened) = opened {
                    chat.close(&opened);
                }
            }
        });
    }

    let (generation, live) = match conversation.borrow().as_ref() {
        Some(open) => (Some(open.feed.generation()), open.live),
        None => (None, false),
    };

    // Refetch whenever the feed is invalidated
    {
        let chat = client.chat.clone();
        let conversation = conversation.clone();
        let messages = messages.clone();

        let key = FeedKey {
            me_id,
            other_user_id,
            generation,
        };

        use_effect_with(key, move |_| {
            let scope = FetchScope::new();
            let current = conversation.borrow().clone();

            if let Some(current) = current {
                let scope = scope.clone();
                spawn_local(async move {
                    match scope.run(chat.load_messages(&current)).await {
                        Ok(list) => messages.set(FetchState::Loaded(list)),
                        Err(ApiError::Cancelled) => {}
                        Err(e) => {
                            warn!(
                                "Failed to load messages with user {}: {}",
                                current.other_user_id, e
                            );
                            messages.set(FetchState::Failed(e.to_string()));
                        }
                    }
                });
            }

            move || scope.cancel()
        });
    }

    let send_scope = use_mut_ref(FetchScope::new);
    {
        let send_scope = send_scope.clone();
        use_effect_with((), move |_| move || send_scope.borrow().cancel());
    }

    let send = {
        let chat = client.chat.clone();
        let conversation = conversation.clone();
        let sending = sending.clone();
        let error = error.clone();
        let scope = send_scope.borrow().clone();

        use_callback(other_user_id, move |body: String, _| {
            let Some(current) = conversation.borrow().clone() else {
                return;
            };
            let chat = chat.clone();
            let sending = sending.clone();
            let error = error.clone();
            let scope = scope.clone();

            sending.set(true);
            error.set(None);
            spawn_local(async move {
                match scope.run(chat.send(&current, &body)).await {
                    Ok(_) => {}
                    Err(ChatError::Api(ApiError::Cancelled)) => return,
                    Err(e) => error.set(Some(e.to_string())),
                }
                // Re-render picks up the bumped feed generation and refetches
                sending.set(false);
            });
        })
    };

    let state = ChatState {
        me,
        messages: (*messages).clone(),
        live,
        sending: *sending,
        error: (*error).clone(),
    };

    UseChatResult {
        state,
        actions: UseChatActions { send },
    }
}
