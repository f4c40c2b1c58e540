/*
[INPUT]:  RentRoll expense, uival and report wire formats
[OUTPUT]: Expense records, payloads, envelopes and export enums
[POS]:    Data layer - wire types shared by client and console
[UPDATE]: When the RentRoll JSON shapes change
*/

pub mod enums;
pub mod models;
pub mod requests;
pub mod responses;

pub use enums::*;
pub use models::*;
pub use requests::*;
pub use responses::*;
