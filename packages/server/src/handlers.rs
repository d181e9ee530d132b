//! HTTP handler functions for the crime API.

use actix_web::{HttpResponse, web};
use crime_api_database::{mutations, queries};
use crime_api_database_models::{CodeQuery, IncidentQuery, NeighborhoodQuery};
use crime_api_server_models::{
    ApiCode, ApiHealth, ApiIncident, ApiNeighborhood, CodeQueryParams, IncidentQueryParams,
    NeighborhoodQueryParams, NewIncidentRequest, RemoveIncidentRequest, ValidatedNewIncident,
};

use crate::AppState;
use crate::error::ApiError;

/// Renders a handler outcome, mapping failures through [`ApiError`].
fn respond(state: &AppState, result: Result<HttpResponse, ApiError>) -> HttpResponse {
    result.unwrap_or_else(|e| e.to_response(state.strict_status_codes))
}

/// `GET /health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /codes`
///
/// Lists incident codes, optionally restricted by `code=110,700`.
pub async fn codes(
    state: web::Data<AppState>,
    params: web::Query<CodeQueryParams>,
) -> HttpResponse {
    let result = async {
        let query = CodeQuery::try_from(&*params)?;
        let codes = queries::query_codes(state.db.as_ref(), &query).await?;
        let body: Vec<ApiCode> = codes.into_iter().map(ApiCode::from).collect();
        Ok::<_, ApiError>(HttpResponse::Ok().json(body))
    }
    .await;

    respond(&state, result)
}

/// `GET /neighborhoods`
///
/// Lists neighborhoods, optionally restricted by `id=1,2`.
pub async fn neighborhoods(
    state: web::Data<AppState>,
    params: web::Query<NeighborhoodQueryParams>,
) -> HttpResponse {
    let result = async {
        let query = NeighborhoodQuery::try_from(&*params)?;
        let neighborhoods = queries::query_neighborhoods(state.db.as_ref(), &query).await?;
        let body: Vec<ApiNeighborhood> = neighborhoods
            .into_iter()
            .map(ApiNeighborhood::from)
            .collect();
        Ok::<_, ApiError>(HttpResponse::Ok().json(body))
    }
    .await;

    respond(&state, result)
}

/// `GET /incidents`
///
/// Lists the most recent incidents matching the date range and
/// code/grid/neighborhood filters, oldest first.
pub async fn incidents(
    state: web::Data<AppState>,
    params: web::Query<IncidentQueryParams>,
) -> HttpResponse {
    let result = async {
        let query = IncidentQuery::try_from(&*params)?;
        let incidents = queries::query_incidents(state.db.as_ref(), &query).await?;
        let body: Vec<ApiIncident> = incidents.into_iter().map(ApiIncident::from).collect();
        Ok::<_, ApiError>(HttpResponse::Ok().json(body))
    }
    .await;

    respond(&state, result)
}

/// `PUT /new-incident`
///
/// Inserts one incident. Fails without touching the store if the case
/// number already exists.
pub async fn new_incident(
    state: web::Data<AppState>,
    body: web::Json<NewIncidentRequest>,
) -> HttpResponse {
    let result = async {
        let ValidatedNewIncident {
            mut incident,
            has_label,
        } = ValidatedNewIncident::try_from(&*body)?;

        if !has_label {
            let label = queries::query_codes(
                state.db.as_ref(),
                &CodeQuery {
                    codes: Some(vec![incident.code]),
                },
            )
            .await?
            .into_iter()
            .next()
            .map(|c| c.incident_type);

            if let Some(label) = label {
                incident.incident = label;
            }
        }

        mutations::insert_incident(state.db.as_ref(), &incident).await?;
        log::info!("Added incident {}", incident.case_number);
        Ok::<_, ApiError>(HttpResponse::Ok().finish())
    }
    .await;

    respond(&state, result)
}

/// `DELETE /remove-incident`
///
/// Removes one incident by case number. Fails if it does not exist.
pub async fn remove_incident(
    state: web::Data<AppState>,
    body: web::Json<RemoveIncidentRequest>,
) -> HttpResponse {
    let result = async {
        let case_number = body.case_number()?;
        mutations::delete_incident(state.db.as_ref(), &case_number).await?;
        log::info!("Removed incident {case_number}");
        Ok::<_, ApiError>(HttpResponse::Ok().finish())
    }
    .await;

    respond(&state, result)
}
