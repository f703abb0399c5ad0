use brain_bridge_core::ClientState;
use std::ops::Deref;
use std::rc::Rc;
use yew::prelude::*;

/// Client services shared through Yew context
#[derive(Clone)]
pub struct ClientContext(pub Rc<ClientState>);

impl PartialEq for ClientContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for ClientContext {
    type Target = ClientState;

    fn deref(&self) -> &ClientState {
        &self.0
    }
}

/// Services provided by `App`; rendering outside it is a programming error
#[hook]
pub fn use_client() -> ClientContext {
    use_context::<ClientContext>().expect("ClientContext is provided by App")
}
