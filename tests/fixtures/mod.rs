pub mod scratch_repo;
