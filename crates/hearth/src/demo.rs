use hearth_core::http::{Request, Response};
use hearth_core::kernel::constants;
use hearth_core::kernel::error::Result;
use hearth_core::provider::{BootableProvider, ServiceProvider};
use hearth_core::routing::{RouteTable, SharedRouter};
use hearth_core::{Application, RequestHooks};

/// Config key that puts the demo application into maintenance mode.
pub const MAINTENANCE_CONFIG_KEY: &str = "app.maintenance";

/// Routes served by the `hearth` binary.
#[derive(Debug, Default)]
pub struct DemoRoutesProvider;

impl ServiceProvider for DemoRoutesProvider {
    fn name(&self) -> &'static str {
        "demo-routes"
    }

    fn register(&self, app: &mut Application) -> Result<()> {
        let environment = app.environment().to_string();

        let mut routes = RouteTable::new();
        routes.add("GET", "/", |_| Ok(Response::ok("Welcome to Hearth")))?;
        routes.add("GET", "/health", |_| Ok(Response::ok("ok")))?;
        routes.add("GET", "/env", move |_| Ok(Response::ok(environment.clone())))?;
        routes.add("POST", "/echo", |req: &Request| {
            Ok(Response::ok(req.body.clone()).with_header("content-type", "text/plain"))
        })?;
        routes.add("GET", "/fail", |_| Err("the /fail route always fails".into()))?;

        app.container_mut().set_value("demo.routes", routes.routes());
        app.bind_router(routes);
        Ok(())
    }

    fn as_bootable(&self) -> Option<&dyn BootableProvider> {
        Some(self)
    }
}

impl BootableProvider for DemoRoutesProvider {
    fn boot(&self, app: &mut Application) -> Result<()> {
        // Fails boot if another provider unbound the router.
        app.container().make::<SharedRouter>(constants::ROUTER_ID)?;
        let routes = app.container().make::<Vec<(String, String)>>("demo.routes")?;
        log::info!("Demo routes ready: {} routes", routes.len());
        Ok(())
    }
}

/// Answers every request with 503 while `app.maintenance` is set and logs
/// handled responses.
#[derive(Debug, Default)]
pub struct DemoHooks;

impl RequestHooks for DemoHooks {
    fn before_handle(&self, app: &Application, _request: &Request) -> Result<Option<Response>> {
        if app.config().get_or(MAINTENANCE_CONFIG_KEY, false) {
            return Ok(Some(Response::new(503, "Down for maintenance")));
        }
        Ok(None)
    }

    fn after_handle(
        &self,
        _app: &Application,
        request: &Request,
        response: &Response,
    ) -> Result<()> {
        log::info!("{} {} -> {}", request.method, request.path, response.status);
        Ok(())
    }
}
