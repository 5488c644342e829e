//! Bit-string encoding of region-based agents

use crate::{
    Error, Result,
    agents::RegionBasedAgent,
    graphs::{ConnectedComponents, UndirectedGraph},
};

/// Number of genes needed to encode agents over `graph`.
pub fn gene_count<T>(graph: &UndirectedGraph<T>) -> usize {
    graph.edge_count()
}

/// One gene per directed edge, ordered by source then target; the gene is 1
/// when both endpoints lie in the same region.
pub fn encode_agent<T>(agent: &RegionBasedAgent<T>) -> Vec<u8> {
    let regions = agent.regions();
    agent
        .graph()
        .directed_edges()
        .map(|(i, j)| u8::from(regions.share_component(i, j)))
        .collect()
}

/// Rebuild an agent from its genes. Regions are the connected components of
/// the edges whose gene is set.
pub fn decode_agent<T: Clone>(
    genes: &[u8],
    graph: &UndirectedGraph<T>,
) -> Result<RegionBasedAgent<T>> {
    let expected = gene_count(graph);
    if genes.len() != expected {
        return Err(Error::EncodingLength {
            expected,
            got: genes.len(),
        });
    }

    let mut kept = graph.without_edges();
    for (index, (edge, &gene)) in graph.directed_edges().zip(genes).enumerate() {
        match gene {
            0 => {}
            1 => {
                kept.add_edge(edge);
            }
            value => return Err(Error::InvalidGene { index, value }),
        }
    }

    let labels = ConnectedComponents::new(kept).labels().to_vec();
    let regions = ConnectedComponents::from_labels(graph.clone(), labels)?;
    RegionBasedAgent::new(regions)
}
