//! Records held by the case registry.
//!
//! Every record carries the sequence number it was created with (creation order decides the
//! "latest" status and the most recently linked decision) and the entity tag of its current
//! representation.

mod besluit;
mod contactmoment;
mod eigenschap;
mod informatieobject;
mod resultaat;
mod rol;
mod status;
mod zaak;

pub use besluit::ZaakBesluit;
pub use contactmoment::ZaakContactMoment;
pub use eigenschap::ZaakEigenschap;
pub use informatieobject::{ObjectInformatieObject, ObjectType};
pub use resultaat::Resultaat;
pub use rol::{
    BetrokkeneIdentificatie, BetrokkeneType, IndicatieMachtiging, Medewerker, NatuurlijkPersoon,
    NietNatuurlijkPersoon, OrganisatorischeEenheid, Rol, RolOmschrijving, Vestiging,
};
pub use status::Status;
pub use zaak::{Archiefstatus, Betalingsindicatie, Geometry, Zaak};

use zrc_uuid::ResourceUuid;

/// Fields shared by every stored record.
pub trait Record: Clone {
    fn uuid(&self) -> ResourceUuid;
    fn seq(&self) -> u64;
    fn etag(&self) -> &str;
}

macro_rules! impl_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Record for $ty {
                fn uuid(&self) -> ResourceUuid {
                    self.uuid
                }

                fn seq(&self) -> u64 {
                    self.seq
                }

                fn etag(&self) -> &str {
                    &self.etag
                }
            }
        )*
    };
}

impl_record!(
    Zaak,
    Status,
    Resultaat,
    Rol,
    ZaakEigenschap,
    ZaakBesluit,
    ObjectInformatieObject,
    ZaakContactMoment,
);
