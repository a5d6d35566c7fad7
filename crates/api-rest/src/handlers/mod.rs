//! One module per resource family. Every handler authenticates first, then checks headers,
//! then calls the matching [`ZaakRegistry`](zrc_core::ZaakRegistry) operation.

pub(crate) mod health;
pub(crate) mod links;
pub(crate) mod resultaten;
pub(crate) mod rollen;
pub(crate) mod statussen;
pub(crate) mod zaken;
