use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::io::{Read, Seek, SeekFrom, Write};
use thiserror::Error;

/// 4KB pages
pub const PAGE_SIZE: usize = 4096;
pub const PAGE_BITS: u32 = 12;

/// An implementation of paged memory backing the full 32-bit address
/// space. Pages are resident (in host RAM), swapped (in a host temp
/// file), or absent; absent pages read as zero. The resident set is
/// bounded by the budget given at construction, with least-recently-used
/// eviction to the swap file.
pub struct Memory {
    /// Resident pages indexed by page number
    resident: HashMap<u32, ResidentPage>,
    /// Page numbers of resident pages, most recently used first
    usage: Vec<u32>,
    max_resident: usize,
    /// Swap slots indexed by page number; the offset is stable once assigned
    swap_records: HashMap<u32, u64>,
    /// Created on first eviction, unlinked by the OS when dropped
    swap: Option<File>,
    next_swap_offset: u64,
    evictions: u64,
    poisoned: bool,
}

struct ResidentPage {
    data: Box<[u8; PAGE_SIZE]>,
    dirty: bool,
}

#[derive(Debug, Error)]
pub enum MemoryFault {
    /// A swap read or write failed on the host side. Memory is
    /// unrecoverable from this point on.
    #[error("swap I/O failed: {0}")]
    SwapIo(#[source] io::Error),
    /// The memory was poisoned by an earlier swap failure.
    #[error("memory is in an unrecoverable state")]
    Unrecoverable,
}

fn page_number(address: u32) -> u32 {
    address >> PAGE_BITS
}

fn page_offset(address: u32) -> usize {
    (address as usize) & (PAGE_SIZE - 1)
}

impl Memory {
    /// Create a memory with the given resident budget. The budget must be
    /// a positive multiple of the page size; anything else is a caller bug.
    pub fn new(budget_bytes: u64) -> Self {
        assert!(
            budget_bytes > 0 && budget_bytes % PAGE_SIZE as u64 == 0,
            "RAM budget must be a positive multiple of the page size"
        );

        Memory {
            resident: HashMap::new(),
            usage: Vec::new(),
            max_resident: (budget_bytes / PAGE_SIZE as u64) as usize,
            swap_records: HashMap::new(),
            swap: None,
            next_swap_offset: 0,
            evictions: 0,
            poisoned: false,
        }
    }

    /// Get the byte at the address
    pub fn read_byte(&mut self, address: u32) -> Result<u8, MemoryFault> {
        self.check_poisoned()?;
        let number = page_number(address);

        if !self.ensure_resident(number)? {
            return Ok(0);
        }

        match self.resident.get(&number) {
            Some(page) => Ok(page.data[page_offset(address)]),
            None => Ok(0),
        }
    }

    pub fn read_half(&mut self, address: u32) -> Result<u16, MemoryFault> {
        let mut bytes = [0; 2];
        self.read(address, &mut bytes)?;
        Ok(u16::from_le_bytes(bytes))
    }

    pub fn read_word(&mut self, address: u32) -> Result<u32, MemoryFault> {
        let mut bytes = [0; 4];
        self.read(address, &mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Set a byte at the address, allocating its page if necessary
    pub fn write_byte(&mut self, address: u32, value: u8) -> Result<(), MemoryFault> {
        self.check_poisoned()?;
        let number = page_number(address);

        if !self.ensure_resident(number)? {
            self.ensure_free_slot()?;
            self.resident.insert(
                number,
                ResidentPage {
                    data: Box::new([0; PAGE_SIZE]),
                    dirty: false,
                },
            );
            self.usage.insert(0, number);
        }

        if let Some(page) = self.resident.get_mut(&number) {
            page.data[page_offset(address)] = value;
            page.dirty = true;
        }
        Ok(())
    }

    pub fn write_half(&mut self, address: u32, value: u16) -> Result<(), MemoryFault> {
        self.write(address, &value.to_le_bytes())
    }

    pub fn write_word(&mut self, address: u32, value: u32) -> Result<(), MemoryFault> {
        self.write(address, &value.to_le_bytes())
    }

    /// Read a range of bytes, page boundaries included
    pub fn read(&mut self, address: u32, buffer: &mut [u8]) -> Result<(), MemoryFault> {
        for (i, byte) in buffer.iter_mut().enumerate() {
            *byte = self.read_byte(address.wrapping_add(i as u32))?;
        }
        Ok(())
    }

    /// Write a range of bytes, page boundaries included
    pub fn write(&mut self, address: u32, data: &[u8]) -> Result<(), MemoryFault> {
        for (i, byte) in data.iter().enumerate() {
            self.write_byte(address.wrapping_add(i as u32), *byte)?;
        }
        Ok(())
    }

    /// Drop every page and swap record. The budget is kept; the next run
    /// starts from all-zero memory. Idempotent.
    pub fn reset(&mut self) {
        self.resident.clear();
        self.usage.clear();
        self.swap_records.clear();
        self.swap = None;
        self.next_swap_offset = 0;
        self.evictions = 0;
        self.poisoned = false;
    }

    pub fn resident_pages(&self) -> usize {
        self.resident.len()
    }

    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    fn check_poisoned(&self) -> Result<(), MemoryFault> {
        if self.poisoned {
            Err(MemoryFault::Unrecoverable)
        } else {
            Ok(())
        }
    }

    /// Make the page resident if it exists anywhere. Returns false for a
    /// page that was never written (absent).
    fn ensure_resident(&mut self, number: u32) -> Result<bool, MemoryFault> {
        if self.resident.contains_key(&number) {
            self.touch(number);
            return Ok(true);
        }

        let offset = match self.swap_records.get(&number) {
            Some(&offset) => offset,
            None => return Ok(false),
        };

        self.ensure_free_slot()?;
        trace!("loading page 0x{:x} from swap offset 0x{:x}", number, offset);
        let mut data = Box::new([0; PAGE_SIZE]);
        self.read_swap(offset, &mut data)?;
        self.resident.insert(number, ResidentPage { data, dirty: false });
        self.usage.insert(0, number);
        Ok(true)
    }

    fn ensure_free_slot(&mut self) -> Result<(), MemoryFault> {
        while self.resident.len() >= self.max_resident {
            self.evict_lru()?;
        }
        Ok(())
    }

    fn evict_lru(&mut self) -> Result<(), MemoryFault> {
        let victim = match self.usage.pop() {
            Some(victim) => victim,
            None => return Ok(()),
        };
        let page = match self.resident.remove(&victim) {
            Some(page) => page,
            None => return Ok(()),
        };

        if page.dirty {
            let offset = match self.swap_records.get(&victim) {
                Some(&offset) => offset,
                None => {
                    let offset = self.next_swap_offset;
                    self.next_swap_offset += PAGE_SIZE as u64;
                    self.swap_records.insert(victim, offset);
                    offset
                }
            };
            debug!("evicting dirty page 0x{:x} to swap offset 0x{:x}", victim, offset);
            self.write_swap(offset, &page.data)?;
        } else {
            debug!("evicting clean page 0x{:x}", victim);
        }

        self.evictions += 1;
        Ok(())
    }

    /// Move the page to the most-recently-used position
    fn touch(&mut self, number: u32) {
        if self.usage.first() == Some(&number) {
            return;
        }
        if let Some(position) = self.usage.iter().position(|&n| n == number) {
            self.usage.remove(position);
        }
        self.usage.insert(0, number);
    }

    fn write_swap(&mut self, offset: u64, data: &[u8; PAGE_SIZE]) -> Result<(), MemoryFault> {
        let result = (|| {
            let file = match &mut self.swap {
                Some(file) => file,
                none => {
                    debug!("creating swap file");
                    none.insert(tempfile::tempfile()?)
                }
            };
            file.seek(SeekFrom::Start(offset))?;
            file.write_all(&data[..])
        })();

        result.map_err(|error| self.poison(error))
    }

    fn read_swap(&mut self, offset: u64, data: &mut [u8; PAGE_SIZE]) -> Result<(), MemoryFault> {
        let result = (|| {
            let file = match &mut self.swap {
                Some(file) => file,
                none => none.insert(tempfile::tempfile()?),
            };
            file.seek(SeekFrom::Start(offset))?;
            file.read_exact(&mut data[..])
        })();

        result.map_err(|error| self.poison(error))
    }

    fn poison(&mut self, error: io::Error) -> MemoryFault {
        error!("swap I/O failure, memory is now unrecoverable: {}", error);
        self.poisoned = true;
        MemoryFault::SwapIo(error)
    }

    #[cfg(test)]
    fn poison_for_test(&mut self) {
        self.poisoned = true;
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Memory({} resident, {} swapped, budget {})",
            self.resident.len(),
            self.swap_records.len(),
            self.max_resident
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_with_pages(pages: u64) -> Memory {
        Memory::new(pages * PAGE_SIZE as u64)
    }

    #[test]
    fn untouched_memory_reads_zero() {
        let mut memory = memory_with_pages(2);
        assert_eq!(memory.read_word(0).unwrap(), 0);
        assert_eq!(memory.read_byte(0xFFFF_FFFF).unwrap(), 0);
        // Reads allocate nothing
        assert_eq!(memory.resident_pages(), 0);
    }

    #[test]
    fn word_round_trip() {
        let mut memory = memory_with_pages(2);
        memory.write_word(0x1000, 0xDEAD_BEEF).unwrap();
        assert_eq!(memory.read_word(0x1000).unwrap(), 0xDEAD_BEEF);
    }

    #[test]
    fn words_are_little_endian() {
        let mut memory = memory_with_pages(2);
        memory.write_word(0x2000, 0x1122_3344).unwrap();
        assert_eq!(memory.read_byte(0x2000).unwrap(), 0x44);
        assert_eq!(memory.read_byte(0x2003).unwrap(), 0x11);
        assert_eq!(memory.read_half(0x2002).unwrap(), 0x1122);
    }

    #[test]
    fn bulk_transfer_crosses_page_boundary() {
        let mut memory = memory_with_pages(2);
        let data: Vec<u8> = (0..=255).collect();
        let base = (PAGE_SIZE - 100) as u32;

        memory.write(base, &data).unwrap();
        let mut back = vec![0; data.len()];
        memory.read(base, &mut back).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn half_written_across_page_boundary() {
        let mut memory = memory_with_pages(2);
        let address = (PAGE_SIZE - 1) as u32;
        memory.write_half(address, 0xBEEF).unwrap();
        assert_eq!(memory.read_byte(address).unwrap(), 0xEF);
        assert_eq!(memory.read_byte(address + 1).unwrap(), 0xBE);
        assert_eq!(memory.read_half(address).unwrap(), 0xBEEF);
    }

    #[test]
    fn footprint_within_budget_never_evicts() {
        let mut memory = memory_with_pages(3);
        for page in 0..3u32 {
            memory.write_word(page << PAGE_BITS, page).unwrap();
        }
        for page in 0..3u32 {
            assert_eq!(memory.read_word(page << PAGE_BITS).unwrap(), page);
        }
        assert_eq!(memory.evictions(), 0);
    }

    #[test]
    fn eviction_round_trips_through_swap() {
        // Three distinct pages against a two-page budget, read back in
        // reverse order
        let mut memory = memory_with_pages(2);
        let addresses = [0x0000, 0x1000, 0x2000];
        for (i, &address) in addresses.iter().enumerate() {
            memory.write_word(address, 0x1111_0000 + i as u32).unwrap();
        }

        for (i, &address) in addresses.iter().enumerate().rev() {
            assert_eq!(memory.read_word(address).unwrap(), 0x1111_0000 + i as u32);
        }
        assert!(memory.evictions() > 0);
        assert!(memory.resident_pages() <= 2);
    }

    #[test]
    fn lru_order_picks_the_coldest_page() {
        let mut memory = memory_with_pages(2);
        memory.write_byte(0x0000, 1).unwrap();
        memory.write_byte(0x1000, 2).unwrap();
        // Touch page 0 so page 1 is the LRU victim
        memory.read_byte(0x0000).unwrap();
        memory.write_byte(0x2000, 3).unwrap();

        assert_eq!(memory.evictions(), 1);
        // Page 0 stayed resident and page 1 went to swap; both still read back
        assert_eq!(memory.read_byte(0x0000).unwrap(), 1);
        assert_eq!(memory.read_byte(0x1000).unwrap(), 2);
    }

    #[test]
    fn thrashing_keeps_every_value() {
        let mut memory = memory_with_pages(2);
        for page in 0..8u32 {
            memory.write_word(page << PAGE_BITS, page * 7 + 1).unwrap();
        }
        for page in 0..8u32 {
            assert_eq!(memory.read_word(page << PAGE_BITS).unwrap(), page * 7 + 1);
        }
    }

    #[test]
    fn reset_clears_all_pages() {
        let mut memory = memory_with_pages(2);
        memory.write_word(0x1000, 42).unwrap();
        memory.reset();
        assert_eq!(memory.read_word(0x1000).unwrap(), 0);
        assert_eq!(memory.resident_pages(), 0);

        // Idempotent
        memory.reset();
        assert_eq!(memory.read_word(0x1000).unwrap(), 0);
    }

    #[test]
    fn poisoned_memory_faults_every_access() {
        let mut memory = memory_with_pages(2);
        memory.write_word(0x1000, 42).unwrap();
        memory.poison_for_test();

        assert!(matches!(
            memory.read_word(0x1000),
            Err(MemoryFault::Unrecoverable)
        ));
        assert!(matches!(
            memory.write_byte(0, 1),
            Err(MemoryFault::Unrecoverable)
        ));

        // Reset discards the failed swap file and recovers
        memory.reset();
        assert_eq!(memory.read_word(0x1000).unwrap(), 0);
    }

    #[test]
    #[should_panic]
    fn zero_budget_is_rejected() {
        Memory::new(0);
    }
}
