pub(crate) mod state;

pub(crate) use state::PolicyState;
