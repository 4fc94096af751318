//! Command declarations, argument assembly and invocation.

pub mod args;
pub mod config;
pub mod declaration;
pub mod invoker;

pub use args::{ArgumentBuilder, ArgumentVector, quote_token};
pub use config::{DEFAULT_RUN_LABEL, FormConfig};
pub use declaration::{
    Arity, CommandSpec, DeclarationError, DefaultValue, OptionSpec, ValueType,
};
pub use invoker::{
    ClapInvoker, EchoInvoker, InvocationOutput, InvocationStatus, Invoker, MatchesHandler,
    ProcessInvoker,
};
