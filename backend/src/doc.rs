//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], the generated specification for the REST API:
//! workflow endpoints, health probes, the shared error envelope, and the
//! bearer token security scheme. Swagger UI serves the document in debug
//! builds.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::workflow::{
    AcceptAnswerBody, CloseIssueBody, PostIssueBody, PostIssueResponseBody, SubmitAnswerBody,
    SuccessBody,
};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Issue workflow backend API",
        description = "Transactional issue/answer workflow: post, answer, accept, close."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::workflow::post_issue,
        crate::inbound::http::workflow::submit_answer,
        crate::inbound::http::workflow::accept_answer,
        crate::inbound::http::workflow::close_issue,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        PostIssueBody,
        SubmitAnswerBody,
        AcceptAnswerBody,
        CloseIssueBody,
        SuccessBody,
        PostIssueResponseBody,
        ErrorSchema,
        ErrorCodeSchema,
    )),
    tags(
        (name = "workflow", description = "Transactional issue/answer operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI document structure.
    use super::*;

    #[test]
    fn document_registers_every_workflow_path() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/post-issue",
            "/api/v1/submit-answer",
            "/api/v1/accept-answer",
            "/api/v1/close-issue",
            "/health/ready",
            "/health/live",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path {path} in OpenAPI document"
            );
        }
    }

    #[test]
    fn error_envelope_schema_is_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        // utoipa replaces :: with . in schema names
        assert!(schemas.contains_key("crate.domain.Error"));
        assert!(schemas.contains_key("crate.domain.ErrorCode"));
    }
}
