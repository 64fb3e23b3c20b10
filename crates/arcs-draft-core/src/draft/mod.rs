// Draft mechanics: turn order, pick records, and the draft state machine.

pub mod order;
pub mod pick;
pub mod state;
