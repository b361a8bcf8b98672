/*
 * Responsibility
 * - Router-wide layers (CORS, request id / tracing / limits)
 * - Authentication is not a layer here: handlers ask their RequestContext
 */
pub mod cors;
pub mod http;
