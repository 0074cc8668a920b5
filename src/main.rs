use anyhow::Result;
use nexus::api::{ApiClient, ApiConfig};
use nexus::graph::{RawEdge, RawGraph, RawNode};
use nexus::render::{ForceGraphEngine, GraphCanvas, LayoutKind};
use nexus::session::GraphSession;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("Nexus Knowledge Graph Explorer v{}", nexus::version());
    println!("==========================================");
    println!();

    // Demo 1: the normalized session store
    let mut session = demo_session();

    // Demo 2: incremental rendering on the force canvas
    demo_canvas(&mut session);

    // Demo 3: live backend, when configured
    match ApiConfig::from_env() {
        Some(config) => demo_live_backend(config).await?,
        None => {
            println!("\n=== Demo 3: Live Backend (skipped) ===");
            println!("Set NEXUS_API_ENDPOINT and NEXUS_API_KEY to search a real backend.");
        }
    }

    Ok(())
}

fn demo_session() -> GraphSession {
    println!("=== Demo 1: Normalized Graph Session ===");

    let mut session = GraphSession::with_graph(RawGraph {
        nodes: vec![
            RawNode::new("acme", "Acme Corp", "COMPANY"),
            RawNode::new("jane", "Jane Doe", "PERSON"),
            RawNode::new("globex", "Globex", "COMPANY"),
            RawNode::new("lisbon", "Lisbon", "LOCATION"),
        ],
        edges: vec![
            RawEdge::new("r1", "jane", "acme", "is a director of"),
            RawEdge::new("r2", "globex", "acme", "is a supplier/partner of"),
            RawEdge::new("r3", "acme", "lisbon", "is headquartered in"),
        ],
    });

    let stats = session.stats();
    println!("✓ Seeded graph: {} entities, {} relationships", stats.entity_count, stats.relationship_count);
    println!("  Entity labels: {:?}", session.entity_labels());

    session.set_search_term(Some("acme".to_string()));
    let view = session.filtered_view();
    println!("✓ Search \"acme\": {} visible entities, {} visible relationships", view.nodes.len(), view.edges.len());
    session.set_search_term(None);

    session.select_entity("acme");
    if let Some(entity) = session.selected_entity() {
        println!("✓ Selected {} ({})", entity.name, entity.label);
    }

    session
}

fn demo_canvas(session: &mut GraphSession) {
    println!("\n=== Demo 2: Incremental Canvas ===");

    let engine = ForceGraphEngine::new(1280.0, 720.0);
    let mut canvas = GraphCanvas::new(Box::new(engine));

    canvas.sync(&session.filtered_view());
    println!("✓ First population rendered with {} layout", canvas.layout());

    // Grow the graph; only the delta is pushed to the engine
    session.batch_update(vec![
        nexus::session::GraphOp::AddEntities(vec![RawNode::new("ines", "Ines Silva", "PERSON")]),
        nexus::session::GraphOp::AddRelationships(vec![RawEdge::new(
            "r4",
            "ines",
            "globex",
            "is an employee/director of",
        )]),
    ]);
    canvas.sync(&session.filtered_view());
    println!("✓ Incremental sync added 1 node and 1 edge without re-adding the rest");

    canvas.set_layout(LayoutKind::Concentric);
    println!("✓ Switched to {} layout", canvas.layout());

    canvas.destroy();
    println!("✓ Canvas destroyed, engine released");
}

async fn demo_live_backend(config: ApiConfig) -> Result<()> {
    println!("\n=== Demo 3: Live Backend ===");

    let client = ApiClient::new(config);
    let hits = client.search("bank").await?;
    println!("✓ Search \"bank\": {} hits", hits.len());

    let mut session = GraphSession::new();
    for hit in hits.iter().take(3) {
        session.add_entity_from_search(hit);
    }

    if let Some(first) = hits.first() {
        if let Some(epoch) = session.begin_expansion(&first.id) {
            let response = client.expand(&first.id).await?;
            session.merge_expansion(&first.id, &response, epoch);
            session.finish_expansion(&first.id);
            let stats = session.stats();
            println!(
                "✓ Expanded {}: graph now {} entities / {} relationships",
                first.name, stats.entity_count, stats.relationship_count
            );
        }
    }

    Ok(())
}
