/*!
Defines types related to the [`RESP`](https://redis.io/docs/reference/protocol-spec/) protocol and their encoding/decoding.

# Object model

The enum [`resp::Value`](Value) is a generic data structure that matches the RESP protocol:
each variant corresponds to one RESP type (simple string, bulk string, integer, double,
array, map, boolean, null, error).

Decoding from the wire is handled by [`ValueDecoder`], a [`tokio_util::codec::Decoder`].
Encoding a request is handled by building a [`Command`] (a name plus a sequence of
[`CommandArg`]) and passing it through the internal [`CommandEncoder`].

# Building commands

A [`Command`] is constructed with [`cmd`] and extended with `.arg(...)`, which accepts
anything implementing [`IntoArgs`]. This crate builds commands for its own topology probes
(`CLUSTER NODES`, `CLUSTER INFO`, `PING`), so only a small, focused set of argument
conversions is provided: integers, strings, booleans and tuples/collections thereof.

# Reading replies

[`FromValue`] converts a decoded [`Value`] back into a Rust type. [`ResultValueExt`] adds
convenience combinators for working with `Result<Value>` values returned by a connection.
*/

mod array;
mod bulk_string;
mod command;
mod command_arg;
mod command_args;
mod command_encoder;
mod from_value;
mod from_value_tuple;
mod into_args;
mod value;
mod value_decoder;

pub use array::*;
pub use bulk_string::*;
pub use command::*;
pub use command_arg::*;
pub use command_args::*;
pub(crate) use command_encoder::*;
pub use from_value::*;
pub use from_value_tuple::*;
pub use into_args::*;
pub use value::*;
pub(crate) use value_decoder::*;
