use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use ev_trip_planner::chargetrip::ChargetripClient;
use ev_trip_planner::config::{PlannerConfig, ServiceConfig, TripParameters};
use ev_trip_planner::estimator::{self, TripSummary};
use ev_trip_planner::haversine::HaversineRouter;
use ev_trip_planner::irve::IrveClient;
use ev_trip_planner::model::{TripPlan, Vehicle};
use ev_trip_planner::nominatim::NominatimClient;
use ev_trip_planner::ors::OrsClient;
use ev_trip_planner::osrm::OsrmClient;
use ev_trip_planner::planner::Planner;
use ev_trip_planner::traits::{RoutingProvider, VehicleCatalog};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Router {
    /// OpenRouteService directions (needs ORS_API_KEY)
    Ors,
    /// OSRM route service at OSRM_BASE_URL
    Osrm,
    /// Straight lines, no routing service
    Offline,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a trip with charging stops
    Plan {
        start: String,
        end: String,

        /// Catalog vehicle id
        #[arg(long, conflicts_with = "kwh", required_unless_present = "kwh")]
        vehicle: Option<String>,

        /// Usable battery capacity, instead of a catalog lookup
        #[arg(long)]
        kwh: Option<f64>,

        #[arg(long, value_enum, default_value_t = Router::Ors)]
        router: Router,

        /// Average speed in km/h
        #[arg(long, default_value_t = 90.0)]
        speed: f64,

        #[arg(long, default_value_t = 0.1)]
        cost_per_km: f64,

        /// Give up after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// List catalog vehicles
    Vehicles,
    /// Estimate duration and cost without planning stops
    Estimate {
        distance_km: f64,

        #[arg(long, default_value_t = 90.0)]
        speed: f64,

        /// Total charge time in minutes
        #[arg(long, conflicts_with_all = ["autonomy", "charge_minutes"])]
        charge_total: Option<f64>,

        /// Vehicle autonomy in km; derives recharges from distance
        #[arg(long, requires = "charge_minutes")]
        autonomy: Option<f64>,

        /// Minutes per full recharge
        #[arg(long)]
        charge_minutes: Option<f64>,

        #[arg(long, default_value_t = 0.1)]
        cost_per_km: f64,
    },
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let services = ServiceConfig::from_env();

    match cli.command {
        Commands::Plan {
            start,
            end,
            vehicle,
            kwh,
            router,
            speed,
            cost_per_km,
            timeout_secs,
        } => {
            let vehicle = match (vehicle, kwh) {
                (_, Some(kwh)) => Vehicle::new("custom", kwh),
                (Some(id), None) => ChargetripClient::new(services.chargetrip.clone())?
                    .vehicle_by_id(&id)?
                    .with_context(|| format!("unknown vehicle {id}"))?,
                (None, None) => anyhow::bail!("either --vehicle or --kwh is required"),
            };
            let mut config = PlannerConfig::default();
            if let Some(secs) = timeout_secs {
                config = config.with_request_timeout(std::time::Duration::from_secs(secs));
            }
            let params = TripParameters {
                avg_speed_kmh: speed,
                cost_per_km,
                ..TripParameters::default()
            };

            let request = PlanRequest {
                start: &start,
                end: &end,
                vehicle: &vehicle,
                params: &params,
            };
            let (plan, summary) = match router {
                Router::Ors => {
                    let router = OrsClient::new(services.ors.clone())?;
                    run_plan(&services, router, config, &request)?
                }
                Router::Osrm => {
                    let router = OsrmClient::new(services.osrm.clone())?;
                    run_plan(&services, router, config, &request)?
                }
                Router::Offline => run_plan(&services, HaversineRouter::default(), config, &request)?,
            };
            print_plan(&plan, &summary);
        }
        Commands::Vehicles => {
            let vehicles = ChargetripClient::new(services.chargetrip)?.vehicles()?;
            info!(count = vehicles.len(), "fetched vehicles");
            for vehicle in vehicles {
                println!(
                    "{}\t{}\t{:.1} kWh",
                    vehicle.id,
                    vehicle.name.as_deref().unwrap_or("-"),
                    vehicle.usable_kwh
                );
            }
        }
        Commands::Estimate {
            distance_km,
            speed,
            charge_total,
            autonomy,
            charge_minutes,
            cost_per_km,
        } => {
            let summary = match (autonomy, charge_minutes) {
                (Some(autonomy), Some(minutes)) => {
                    estimator::estimate_offline(distance_km, speed, autonomy, minutes, cost_per_km)?
                }
                _ => estimator::estimate(distance_km, speed, charge_total.unwrap_or(0.0), cost_per_km)?,
            };
            println!("{summary}");
        }
    }

    Ok(())
}

struct PlanRequest<'a> {
    start: &'a str,
    end: &'a str,
    vehicle: &'a Vehicle,
    params: &'a TripParameters,
}

fn run_plan<R: RoutingProvider>(
    services: &ServiceConfig,
    router: R,
    config: PlannerConfig,
    request: &PlanRequest<'_>,
) -> Result<(TripPlan, TripSummary), anyhow::Error> {
    let geocoder = NominatimClient::new(services.nominatim.clone())?;
    let locator = IrveClient::new(services.irve.clone())?;
    let planner = Planner::new(geocoder, router, locator, config);

    Ok(planner.plan_and_estimate(request.start, request.end, request.vehicle, request.params)?)
}

fn print_plan(plan: &TripPlan, summary: &TripSummary) {
    println!(
        "{} segment(s), {:.1} km, autonomy {:.0} km",
        plan.segments.len(),
        plan.total_distance_km,
        plan.autonomy_km
    );
    for (i, stop) in plan.stops.iter().enumerate() {
        println!(
            "  stop {}: {} ({}) {:.0} kW, {:.1} min",
            i + 1,
            stop.station_name,
            stop.address,
            stop.power_kw,
            stop.charge_minutes
        );
    }
    println!("{summary}");
}
