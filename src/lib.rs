// Service configuration
pub mod config;

// Mock tracking feeds, snapshot stores and list filtering
pub mod tracking;

// Map marker layer
pub mod map;

// Registration flow and QR display
pub mod registration;

// HTTP and WebSocket APIs
pub mod api;

// WebSocket subscription management
pub mod subscription;
