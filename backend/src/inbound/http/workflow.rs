//! Workflow HTTP handlers.
//!
//! ```text
//! POST /api/v1/post-issue     {"title","description","domain"}
//! POST /api/v1/submit-answer  {"issueId","text"}
//! POST /api/v1/accept-answer  {"issueId","answerId"}
//! POST /api/v1/close-issue    {"issueId"}
//! ```
//!
//! Every endpoint is POST-only with a bearer token in the `Authorization`
//! header; any other method answers 405. The credential is verified before
//! the body is validated, so an unauthenticated caller learns nothing about
//! payload expectations.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{
    AcceptAnswerRequest, CloseIssueRequest, PostIssueRequest, SubmitAnswerRequest,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::{BearerAuth, require_subject};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_answer_id, parse_issue_id, require_field,
};

/// Request payload for posting an issue.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostIssueBody {
    /// Issue title.
    pub title: Option<String>,
    /// Problem description.
    pub description: Option<String>,
    /// Expertise tag the issue is filed under.
    pub domain: Option<String>,
}

/// Request payload for submitting an answer.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerBody {
    /// Issue being answered.
    pub issue_id: Option<String>,
    /// Answer body.
    pub text: Option<String>,
}

/// Request payload for accepting an answer.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcceptAnswerBody {
    /// Issue the answer belongs to.
    pub issue_id: Option<String>,
    /// Answer being accepted.
    pub answer_id: Option<String>,
}

/// Request payload for closing an issue.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloseIssueBody {
    /// Issue to close.
    pub issue_id: Option<String>,
}

/// Response payload shared by the workflow mutations.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SuccessBody {
    /// Always true; failures use the error envelope instead.
    pub success: bool,
}

/// Response payload for issue intake.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostIssueResponseBody {
    /// Always true; failures use the error envelope instead.
    pub success: bool,
    /// Identifier of the created issue.
    pub issue_id: String,
}

const SUCCESS: SuccessBody = SuccessBody { success: true };

/// Post a new issue in its initial open state.
#[utoipa::path(
    post,
    path = "/api/v1/post-issue",
    request_body = PostIssueBody,
    responses(
        (status = 200, description = "Issue created", body = PostIssueResponseBody),
        (status = 400, description = "Missing field", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Profile not found", body = ErrorSchema),
        (status = 405, description = "Method not allowed", body = ErrorSchema)
    ),
    tags = ["workflow"],
    operation_id = "postIssue",
    security(("BearerToken" = []))
)]
pub async fn post_issue(
    state: web::Data<HttpState>,
    auth: BearerAuth,
    payload: web::Json<PostIssueBody>,
) -> ApiResult<web::Json<PostIssueResponseBody>> {
    let subject = require_subject(state.identity.as_ref(), &auth).await?;
    let PostIssueBody {
        title,
        description,
        domain,
    } = payload.into_inner();

    let response = state
        .intake
        .post_issue(PostIssueRequest {
            title: require_field(title, FieldName::new("title"))?,
            description: require_field(description, FieldName::new("description"))?,
            domain: require_field(domain, FieldName::new("domain"))?,
            subject,
        })
        .await?;

    Ok(web::Json(PostIssueResponseBody {
        success: true,
        issue_id: response.issue_id.to_string(),
    }))
}

/// Record an answer under an open issue.
#[utoipa::path(
    post,
    path = "/api/v1/submit-answer",
    request_body = SubmitAnswerBody,
    responses(
        (status = 200, description = "Answer recorded", body = SuccessBody),
        (status = 400, description = "Missing field", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Company admins cannot answer", body = ErrorSchema),
        (status = 404, description = "Issue or user not found", body = ErrorSchema),
        (status = 405, description = "Method not allowed", body = ErrorSchema),
        (status = 409, description = "Issue is closed", body = ErrorSchema)
    ),
    tags = ["workflow"],
    operation_id = "submitAnswer",
    security(("BearerToken" = []))
)]
pub async fn submit_answer(
    state: web::Data<HttpState>,
    auth: BearerAuth,
    payload: web::Json<SubmitAnswerBody>,
) -> ApiResult<web::Json<SuccessBody>> {
    let subject = require_subject(state.identity.as_ref(), &auth).await?;
    let SubmitAnswerBody { issue_id, text } = payload.into_inner();

    state
        .workflow
        .submit_answer(SubmitAnswerRequest {
            issue_id: parse_issue_id(issue_id, FieldName::new("issueId"))?,
            text: require_field(text, FieldName::new("text"))?,
            subject,
        })
        .await?;

    Ok(web::Json(SUCCESS))
}

/// Accept an answer exactly once and award its author.
#[utoipa::path(
    post,
    path = "/api/v1/accept-answer",
    request_body = AcceptAnswerBody,
    responses(
        (status = 200, description = "Answer accepted", body = SuccessBody),
        (status = 400, description = "Missing field", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Only the issue owner may accept", body = ErrorSchema),
        (status = 404, description = "Issue or answer not found", body = ErrorSchema),
        (status = 405, description = "Method not allowed", body = ErrorSchema),
        (status = 409, description = "Already accepted or issue closed", body = ErrorSchema)
    ),
    tags = ["workflow"],
    operation_id = "acceptAnswer",
    security(("BearerToken" = []))
)]
pub async fn accept_answer(
    state: web::Data<HttpState>,
    auth: BearerAuth,
    payload: web::Json<AcceptAnswerBody>,
) -> ApiResult<web::Json<SuccessBody>> {
    let subject = require_subject(state.identity.as_ref(), &auth).await?;
    let AcceptAnswerBody {
        issue_id,
        answer_id,
    } = payload.into_inner();

    state
        .workflow
        .accept_answer(AcceptAnswerRequest {
            issue_id: parse_issue_id(issue_id, FieldName::new("issueId"))?,
            answer_id: parse_answer_id(answer_id, FieldName::new("answerId"))?,
            subject,
        })
        .await?;

    Ok(web::Json(SUCCESS))
}

/// Close an open issue. Terminal: nothing ever reopens it.
#[utoipa::path(
    post,
    path = "/api/v1/close-issue",
    request_body = CloseIssueBody,
    responses(
        (status = 200, description = "Issue closed", body = SuccessBody),
        (status = 400, description = "Missing field", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Not the owner or a matching admin", body = ErrorSchema),
        (status = 404, description = "Issue or user not found", body = ErrorSchema),
        (status = 405, description = "Method not allowed", body = ErrorSchema),
        (status = 409, description = "Already closed", body = ErrorSchema)
    ),
    tags = ["workflow"],
    operation_id = "closeIssue",
    security(("BearerToken" = []))
)]
pub async fn close_issue(
    state: web::Data<HttpState>,
    auth: BearerAuth,
    payload: web::Json<CloseIssueBody>,
) -> ApiResult<web::Json<SuccessBody>> {
    let subject = require_subject(state.identity.as_ref(), &auth).await?;
    let CloseIssueBody { issue_id } = payload.into_inner();

    state
        .workflow
        .close_issue(CloseIssueRequest {
            issue_id: parse_issue_id(issue_id, FieldName::new("issueId"))?,
            subject,
        })
        .await?;

    Ok(web::Json(SUCCESS))
}

async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(Error::invalid_request("method not allowed"))
}

/// Mount the workflow endpoints on a scope (normally `/api/v1`).
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/post-issue")
            .route(web::post().to(post_issue))
            .route(web::route().to(method_not_allowed)),
    )
    .service(
        web::resource("/submit-answer")
            .route(web::post().to(submit_answer))
            .route(web::route().to(method_not_allowed)),
    )
    .service(
        web::resource("/accept-answer")
            .route(web::post().to(accept_answer))
            .route(web::route().to(method_not_allowed)),
    )
    .service(
        web::resource("/close-issue")
            .route(web::post().to(close_issue))
            .route(web::route().to(method_not_allowed)),
    );
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
