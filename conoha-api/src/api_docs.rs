use conoha_common::{ErrorCode, MinecraftRequest, MinecraftResponse, StreamError};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "ConoHa command bridge"),
    paths(crate::handlers::minecraft::minecraft),
    components(schemas(MinecraftRequest, MinecraftResponse, StreamError, ErrorCode)),
    tags((name = "minecraft", description = "Chat commands for the ConoHa game server"))
)]
pub struct ApiDoc;
