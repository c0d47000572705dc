//! Chunk a short document and print each chunk with its metadata

use kapwa_core::{Chunker, Document};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let text = "Dr. Reyes works at sea. Mr. Cruz is an OFW in Dubai. Pamilya niya ay masaya.\n\n\
                Ang remittance ay ipinapadala tuwing katapusan ng buwan. \
                The family uses it for tuition and rent. Minsan may sobra para sa ipon.";

    let chunker = Chunker::builder().max_tokens(32).overlap_tokens(12).build()?;
    println!("Tokenizer: {}", chunker.tokenizer().mode());

    let set = chunker.chunk_document(&Document::new("gabay.txt", text));
    println!(
        "{} chunks from {} sentences, {:.1} tokens on average",
        set.len(),
        set.stats.sentences,
        set.avg_tokens()
    );

    for chunk in &set.chunks {
        println!(
            "\n[{}] {} tokens, {} chars, {} overlapping sentence(s)",
            chunk.position_index, chunk.token_count, chunk.char_length, chunk.overlap_sentences
        );
        println!("  {}", chunk.text);
    }

    Ok(())
}
