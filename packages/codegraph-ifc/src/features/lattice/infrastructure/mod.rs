pub mod security_lattice;

pub use security_lattice::SecurityLattice;
