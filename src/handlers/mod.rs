// Handlers are split by access tier:
// public (no session required) and protected (behind the session gate).
pub mod protected;
pub mod public;
