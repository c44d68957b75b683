pub mod projector_handlers;
