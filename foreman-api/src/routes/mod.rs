/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `admin`: Director-only account management
/// - `tasks`: Task creation, approval, and listing

pub mod admin;
pub mod auth;
pub mod health;
pub mod tasks;
