//! Programmable transactions: arguments, inputs, commands and the
//! `TransactionData` envelope, with their BCS wire forms.

mod argument;
mod call_arg;
mod command;
mod data;
mod reindex;

pub use argument::Argument;
pub use call_arg::{CallArg, ObjectArg, UnresolvedObject};
pub use command::{Command, ProgrammableMoveCall, TransactionIntent};
pub use data::{transaction_digest, GasData, TransactionData, TransactionExpiration};
pub use reindex::{map_arguments, replace_command};
