use actix::Addr;
use actix_web::{web, HttpResponse};

use crate::actors::{
    AddOrder, ApproveFinancials, CurrentUser, FindOrder, FinishOrder, ListOrders, Login, Logout,
    OpenFinancialReview, OpenVehicleDelivery, OrderHistory, RecordVehicleDelivery, RejectFinancials,
    SessionActor, UpdateOrderStatus,
};
use crate::domain::order::OrderCreationData;
use crate::workflows::{ApprovalForm, DeliveryForm};
use super::types::{LoginRequest, RejectionRequest, SessionResponse, StatusUpdateRequest};
use super::ApiError;

type Session = web::Data<Addr<SessionActor>>;
type ApiResult = Result<HttpResponse, ApiError>;

// ============================================================================
// Router
// ============================================================================

/// Register every /api route; the app must carry `Data<Addr<SessionActor>>`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/session", web::get().to(current_session))
            .route("/session/login", web::post().to(login))
            .route("/session/logout", web::post().to(logout))
            .route("/orders", web::get().to(list_orders))
            .route("/orders", web::post().to(create_order))
            .route("/orders/{number}", web::get().to(get_order))
            .route("/orders/{number}/history", web::get().to(order_history))
            .route("/orders/{number}/status", web::post().to(update_status))
            .route("/orders/{number}/financial-review", web::post().to(open_financial_review))
            .route("/orders/{number}/financial-approval", web::post().to(approve_financials))
            .route("/orders/{number}/financial-rejection", web::post().to(reject_financials))
            .route("/orders/{number}/delivery-review", web::post().to(open_vehicle_delivery))
            .route("/orders/{number}/vehicle-delivery", web::post().to(record_vehicle_delivery))
            .route("/orders/{number}/finish", web::post().to(finish_order)),
    );
}

// ============================================================================
// Session
// ============================================================================

async fn current_session(session: Session) -> ApiResult {
    let user = session.send(CurrentUser).await?;
    Ok(HttpResponse::Ok().json(SessionResponse { user }))
}

async fn login(session: Session, body: web::Json<LoginRequest>) -> ApiResult {
    let LoginRequest { username, password } = body.into_inner();
    let user = session.send(Login { username, password }).await??;
    Ok(HttpResponse::Ok().json(SessionResponse { user: Some(user) }))
}

async fn logout(session: Session) -> ApiResult {
    session.send(Logout).await?;
    Ok(HttpResponse::NoContent().finish())
}

// ============================================================================
// Orders
// ============================================================================

async fn list_orders(session: Session) -> ApiResult {
    let orders = session.send(ListOrders).await?;
    Ok(HttpResponse::Ok().json(orders))
}

async fn create_order(session: Session, body: web::Json<OrderCreationData>) -> ApiResult {
    let order = session.send(AddOrder { data: body.into_inner() }).await??;
    Ok(HttpResponse::Created().json(order))
}

async fn get_order(session: Session, path: web::Path<String>) -> ApiResult {
    let order = session
        .send(FindOrder { order_number: path.into_inner() })
        .await??;
    Ok(HttpResponse::Ok().json(order))
}

async fn order_history(session: Session, path: web::Path<String>) -> ApiResult {
    let events = session
        .send(OrderHistory { order_number: path.into_inner() })
        .await??;
    Ok(HttpResponse::Ok().json(events))
}

async fn update_status(
    session: Session,
    path: web::Path<String>,
    body: web::Json<StatusUpdateRequest>,
) -> ApiResult {
    let StatusUpdateRequest { status, actor, details } = body.into_inner();
    let order = session
        .send(UpdateOrderStatus {
            order_number: path.into_inner(),
            status,
            actor,
            details,
        })
        .await??;
    Ok(HttpResponse::Ok().json(order))
}

// ============================================================================
// Financial Approval
// ============================================================================

async fn open_financial_review(session: Session, path: web::Path<String>) -> ApiResult {
    let review = session
        .send(OpenFinancialReview { order_number: path.into_inner() })
        .await??;
    Ok(HttpResponse::Ok().json(review))
}

async fn approve_financials(
    session: Session,
    path: web::Path<String>,
    body: web::Json<ApprovalForm>,
) -> ApiResult {
    let order = session
        .send(ApproveFinancials {
            order_number: path.into_inner(),
            form: body.into_inner(),
        })
        .await??;
    Ok(HttpResponse::Ok().json(order))
}

async fn reject_financials(
    session: Session,
    path: web::Path<String>,
    body: Option<web::Json<RejectionRequest>>,
) -> ApiResult {
    let notes = body.and_then(|b| b.into_inner().notes);
    let order = session
        .send(RejectFinancials {
            order_number: path.into_inner(),
            notes,
        })
        .await??;
    Ok(HttpResponse::Ok().json(order))
}

// ============================================================================
// Vehicle Delivery
// ============================================================================

async fn open_vehicle_delivery(session: Session, path: web::Path<String>) -> ApiResult {
    let review = session
        .send(OpenVehicleDelivery { order_number: path.into_inner() })
        .await??;
    Ok(HttpResponse::Ok().json(review))
}

async fn record_vehicle_delivery(
    session: Session,
    path: web::Path<String>,
    body: web::Json<DeliveryForm>,
) -> ApiResult {
    let order = session
        .send(RecordVehicleDelivery {
            order_number: path.into_inner(),
            form: body.into_inner(),
        })
        .await??;
    Ok(HttpResponse::Ok().json(order))
}

async fn finish_order(session: Session, path: web::Path<String>) -> ApiResult {
    let order = session
        .send(FinishOrder { order_number: path.into_inner() })
        .await??;
    Ok(HttpResponse::Ok().json(order))
}

// ============================================================================
// Tests
// ============================================================================
